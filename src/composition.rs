use crate::{
    config::LayoutConfig,
    error::{ComposeError, Result, Warning},
    font::BuiltinFont,
    info::Info,
    outline::Outline,
    page::Page,
    refs::{ObjectReferences, RefType},
    units::Pt,
};
use id_arena::{Arena, Id};
use pdf_writer::{Finish, Pdf, Ref};
use std::io::Write;

/// The vertical extent of one atomic write, measured from the top of its page
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub section: usize,
    pub block: usize,
    pub page_index: usize,
    pub top: Pt,
    pub bottom: Pt,
}

/// A laid-out document: every page with everything placed on it, kept in
/// memory so pages can be revisited until the whole thing is written out
/// with a call to [Composition::write]
#[derive(Debug)]
pub struct Composition {
    pub info: Info,
    pub config: LayoutConfig,
    pub pages: Arena<Page>,
    pub page_order: Vec<Id<Page>>,
    pub outline: Outline,
    /// Every reservation made while flowing content, in order
    pub placements: Vec<Placement>,
    pub warnings: Vec<Warning>,
}

impl Composition {
    pub fn new(info: Info, config: LayoutConfig) -> Composition {
        Composition {
            info,
            config,
            pages: Arena::new(),
            page_order: Vec::new(),
            outline: Outline::default(),
            placements: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a fresh page belonging to `section`, returning its index within
    /// the document
    pub fn open_page(&mut self, section: usize) -> usize {
        let id = self.pages.alloc(Page::new(&self.config, section));
        self.page_order.push(id);
        self.page_order.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Get the page Id of a page at the given index. Returns [None] if
    /// `page_index >= self.page_order.len()`.
    pub fn id_of_page_index(&self, page_index: usize) -> Option<Id<Page>> {
        self.page_order.get(page_index).copied()
    }

    pub fn page(&self, page_index: usize) -> Option<&Page> {
        self.id_of_page_index(page_index)
            .and_then(|id| self.pages.get(id))
    }

    pub fn page_mut(&mut self, page_index: usize) -> Option<&mut Page> {
        self.id_of_page_index(page_index)
            .and_then(|id| self.pages.get_mut(id))
    }

    /// Pages in document order
    pub fn iter_pages(&self) -> impl Iterator<Item = &Page> {
        self.page_order.iter().filter_map(|id| self.pages.get(*id))
    }

    /// `true` if the page has nothing drawn on it (or doesn't exist)
    pub fn is_blank(&self, page_index: usize) -> bool {
        self.page(page_index).map_or(true, Page::is_blank)
    }

    pub(crate) fn reassign_section(&mut self, page_index: usize, section: usize) {
        if let Some(page) = self.page_mut(page_index) {
            page.section = section;
        }
    }

    /// Placements made on behalf of one section
    pub fn placements_of(&self, section: usize) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(move |p| p.section == section)
    }

    /// Serialise the document to PDF bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut refs = ObjectReferences::new();

        let catalog_id = refs.gen(RefType::Catalog);
        let page_tree_id = refs.gen(RefType::PageTree);

        let mut writer = Pdf::new();
        self.info.write(&mut refs, &mut writer);

        // page refs are keyed by position in the document so that bookmarks
        // can reference pages by index
        let page_refs: Vec<Ref> = (0..self.page_order.len())
            .map(|i| refs.gen(RefType::Page(i)))
            .collect();

        writer
            .pages(page_tree_id)
            .count(page_refs.len() as i32)
            .kids(page_refs);

        for font in BuiltinFont::ALL {
            font.write(&mut refs, &mut writer);
        }

        for (page_index, id) in self.page_order.iter().enumerate() {
            let page = self
                .pages
                .get(*id)
                .ok_or(ComposeError::PageMissing(page_index))?;
            page.write(&mut refs, page_index, self.config.compress, &mut writer)?;
        }

        let outlines_id = self.outline.write(&mut refs, &mut writer);

        let mut catalog = writer.catalog(catalog_id);
        catalog.pages(page_tree_id);
        if let Some(outlines_id) = outlines_id {
            catalog.outlines(outlines_id);
        }
        catalog.finish();

        Ok(writer.finish())
    }

    /// Write the entire document to the writer and flush it, returning the
    /// number of bytes written. The document is rendered in memory first, so
    /// nothing reaches the writer unless serialisation succeeded.
    pub fn write<W: Write>(&self, mut w: W) -> Result<usize> {
        let bytes = self.to_bytes()?;
        w.write_all(bytes.as_slice())
            .and_then(|_| w.flush())
            .map_err(|e| ComposeError::sink(None, e))?;
        Ok(bytes.len())
    }

    #[cfg(test)]
    pub(crate) fn mark(&mut self, page_index: usize) {
        if let Some(page) = self.page_mut(page_index) {
            page.add_line(
                (Pt::ZERO, Pt::ZERO),
                (Pt(1.0), Pt::ZERO),
                crate::colour::colours::RULE,
                Pt(1.0),
            );
        }
    }
}
