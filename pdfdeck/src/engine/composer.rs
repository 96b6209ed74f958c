//! Building new documents out of pages copied from loaded sources.
//!
//! The lopdf composer copies a page together with every object it reaches
//! (content streams, resources, fonts, images, annotations) into the target
//! document under fresh object ids. Attributes the page inherits from its
//! page tree are written onto the copy, since the copy gets a new parent.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashMap;

use crate::config::CompressionLevel;
use crate::error::{PdfDeckError, Result};
use crate::ledger::Rotation;
use crate::utils::{self, INHERITABLE_PAGE_KEYS};

/// Document construction capability used by the export pipeline.
pub trait PageComposer {
    /// A loaded source document.
    type Source;
    /// A document under construction.
    type Target;
    /// Handle of a page copied into a target but not yet appended.
    type Page: Copy;

    /// Load a source document from its bytes.
    ///
    /// # Errors
    ///
    /// Returns `SourceDecode` or `EncryptedPdf` if the bytes cannot be loaded.
    fn load(&self, name: &str, bytes: &[u8]) -> Result<Self::Source>;

    /// Create an empty target document.
    fn create(&self) -> Result<Self::Target>;

    /// Copy the page at 0-based `page_index` of `source` into `target`.
    fn copy_page(
        &self,
        target: &mut Self::Target,
        source: &Self::Source,
        page_index: usize,
    ) -> Result<Self::Page>;

    /// Set the absolute rotation of a copied page.
    fn set_rotation(
        &self,
        target: &mut Self::Target,
        page: Self::Page,
        rotation: Rotation,
    ) -> Result<()>;

    /// Append a copied page to the end of the target's page sequence.
    fn append_page(&self, target: &mut Self::Target, page: Self::Page) -> Result<()>;

    /// Serialize a finished target.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the document cannot be written.
    fn serialize(&self, target: Self::Target) -> Result<Vec<u8>>;
}

/// A source document loaded by [`LopdfComposer`].
#[derive(Debug)]
pub struct SourceDocument {
    name: String,
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Name of the file this document was loaded from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

/// A document under construction by [`LopdfComposer`].
#[derive(Debug)]
pub struct OutputDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl OutputDocument {
    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// The underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

/// [`PageComposer`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfComposer {
    compression: CompressionLevel,
}

impl LopdfComposer {
    /// Create a composer that serializes with the given compression.
    pub fn new(compression: CompressionLevel) -> Self {
        Self { compression }
    }

    /// Compression applied on serialization.
    pub fn compression(&self) -> CompressionLevel {
        self.compression
    }
}

impl PageComposer for LopdfComposer {
    type Source = SourceDocument;
    type Target = OutputDocument;
    type Page = ObjectId;

    fn load(&self, name: &str, bytes: &[u8]) -> Result<SourceDocument> {
        let document = super::load_document(name, bytes)?;
        let page_ids = document.get_pages().into_values().collect();

        Ok(SourceDocument {
            name: name.to_string(),
            document,
            page_ids,
        })
    }

    fn create(&self) -> Result<OutputDocument> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }
            .into(),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let info_id = document.add_object(dictionary! {
            "Producer" => Object::string_literal(format!("{} {}", crate::NAME, crate::VERSION)),
        });
        document.trailer.set("Info", info_id);

        Ok(OutputDocument {
            document,
            pages_id,
            kids: Vec::new(),
        })
    }

    fn copy_page(
        &self,
        target: &mut OutputDocument,
        source: &SourceDocument,
        page_index: usize,
    ) -> Result<ObjectId> {
        let source_page_id =
            *source
                .page_ids
                .get(page_index)
                .ok_or(PdfDeckError::PageOutOfRange {
                    page: page_index + 1,
                    page_count: source.page_ids.len(),
                })?;

        let mut page = source
            .document
            .get_dictionary(source_page_id)
            .map_err(|err| PdfDeckError::construct(format!("page object unreadable: {err}")))?
            .clone();

        for key in INHERITABLE_PAGE_KEYS {
            if !page.has(key)
                && let Some(value) = utils::inherited_attribute(&source.document, source_page_id, key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        page.remove(b"Parent");

        let page_id = target.document.new_object_id();
        let mut importer = ObjectImporter::new(&source.document, &mut target.document);
        importer.imported.insert(source_page_id, page_id);

        let mut copy = importer.import_dictionary(&page);
        copy.set("Parent", target.pages_id);
        target.document.objects.insert(page_id, Object::Dictionary(copy));

        Ok(page_id)
    }

    fn set_rotation(
        &self,
        target: &mut OutputDocument,
        page: ObjectId,
        rotation: Rotation,
    ) -> Result<()> {
        let page = target
            .document
            .get_dictionary_mut(page)
            .map_err(|err| PdfDeckError::construct(format!("copied page missing: {err}")))?;
        page.set("Rotate", i64::from(rotation.as_degrees()));
        Ok(())
    }

    fn append_page(&self, target: &mut OutputDocument, page: ObjectId) -> Result<()> {
        if !target.document.objects.contains_key(&page) {
            return Err(PdfDeckError::construct(format!(
                "page {} {} R is not part of the target document",
                page.0, page.1
            )));
        }
        target.kids.push(page);
        Ok(())
    }

    fn serialize(&self, target: OutputDocument) -> Result<Vec<u8>> {
        let OutputDocument {
            mut document,
            pages_id,
            kids,
        } = target;

        let count = kids.len() as i64;
        let kids: Vec<Object> = kids.into_iter().map(Object::Reference).collect();
        document.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }
            .into(),
        );

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                document.prune_objects();
                document.compress();
            }
        }

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|err| PdfDeckError::serialization(err.to_string()))?;
        Ok(bytes)
    }
}

/// Copies objects from one document into another, renumbering references.
///
/// References to other page-tree nodes are replaced with `null` so that a
/// copied page never drags its siblings along.
struct ObjectImporter<'a> {
    source: &'a Document,
    target: &'a mut Document,
    imported: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectImporter<'a> {
    fn new(source: &'a Document, target: &'a mut Document) -> Self {
        Self {
            source,
            target,
            imported: HashMap::new(),
        }
    }

    fn import(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(*id),
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(dict)),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.import(item)).collect())
            }
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.import_dictionary(&stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn import_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.import(value));
        }
        copy
    }

    fn import_reference(&mut self, id: ObjectId) -> Object {
        if let Some(new_id) = self.imported.get(&id) {
            return Object::Reference(*new_id);
        }

        let source = self.source;
        let Ok(object) = source.get_object(id) else {
            return Object::Null;
        };
        if utils::is_page_tree_node(object) {
            return Object::Null;
        }

        let new_id = self.target.new_object_id();
        self.imported.insert(id, new_id);
        let copy = self.import(object);
        self.target.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }
}
