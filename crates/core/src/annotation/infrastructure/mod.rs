pub mod glyphs;
pub mod imageproc_annotator;
