pub mod compass;
pub mod document;
pub mod html;

use compass::IconFile;

/// Output of one render: the page plus the icons it links to.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub region_id: String,
    pub level: u8,
    pub modifier: String,
    pub group_count: usize,
    pub html: String,
    pub icons: Vec<IconFile>,
}
