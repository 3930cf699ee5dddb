use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    foundation::error::{HifzError, HifzResult},
    layout::model::LayoutPage,
};

/// Where layout documents come from.
///
/// Implementations do the I/O; everything downstream works on the returned in-memory page.
/// Loading the same page twice must yield the same document.
pub trait LayoutSource: Send + Sync {
    /// Load the layout document for `page`.
    fn load_page(&self, page: u32) -> HifzResult<LayoutPage>;
}

/// File name of a page's layout document (`page-001.json`).
pub fn layout_file_name(page: u32) -> String {
    format!("page-{page:03}.json")
}

#[derive(Clone, Debug)]
/// Reads `page-NNN.json` documents from a directory.
pub struct DirLayoutSource {
    root: PathBuf,
}

impl DirLayoutSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a page's document.
    pub fn path_for(&self, page: u32) -> PathBuf {
        self.root.join(layout_file_name(page))
    }
}

impl LayoutSource for DirLayoutSource {
    fn load_page(&self, page: u32) -> HifzResult<LayoutPage> {
        let path = self.path_for(page);
        if !path.is_file() {
            return Err(HifzError::layout(format!(
                "no layout document for page {page} at '{}'",
                path.display()
            )));
        }
        LayoutPage::from_path(&path)
    }
}

#[derive(Clone, Debug, Default)]
/// In-memory pages, keyed by page number.
pub struct MemoryLayoutSource {
    pages: BTreeMap<u32, LayoutPage>,
}

impl MemoryLayoutSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a page, keyed by its own page number.
    pub fn insert(&mut self, page: LayoutPage) {
        self.pages.insert(page.page, page);
    }
}

impl FromIterator<LayoutPage> for MemoryLayoutSource {
    fn from_iter<I: IntoIterator<Item = LayoutPage>>(iter: I) -> Self {
        let mut out = Self::new();
        for p in iter {
            out.insert(p);
        }
        out
    }
}

impl LayoutSource for MemoryLayoutSource {
    fn load_page(&self, page: u32) -> HifzResult<LayoutPage> {
        self.pages
            .get(&page)
            .cloned()
            .ok_or_else(|| HifzError::layout(format!("no layout document for page {page}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/source.rs"]
mod tests;
