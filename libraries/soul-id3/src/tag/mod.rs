//! Tag container
//!
//! A [`Tag`] is a version plus an ordered multimap of frames. Reading and
//! writing live in submodules; this module only maintains the frame list and
//! the one-frame-per-identifier rule for non-repeatable frames.

mod header;
mod order;
mod read;
mod write;

pub use header::{ExtendedHeader, TagFlags, TagHeader, TagRestrictions, HEADER_LEN};
pub use order::frame_order;
pub use read::{read_tag, read_tag_with, ReadDiagnostics, ScanStop};
pub use write::{write_tag, Substitution, TagWriter, WriteReport};

use crate::frame::Frame;
use crate::registry;
use crate::version::TagVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    version: TagVersion,
    pub flags: TagFlags,
    pub extended_header: Option<ExtendedHeader>,
    frames: Vec<Frame>,
    /// What the reader skipped or stopped on
    pub diagnostics: ReadDiagnostics,
}

impl Tag {
    pub fn new(version: TagVersion) -> Self {
        Self {
            version,
            flags: TagFlags::default(),
            extended_header: None,
            frames: Vec::new(),
            diagnostics: ReadDiagnostics::default(),
        }
    }

    pub fn version(&self) -> TagVersion {
        self.version
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// First frame with `id`
    pub fn frame(&self, id: &str) -> Option<&Frame> {
        self.frames.iter().find(|f| f.id == id)
    }

    pub fn frame_mut(&mut self, id: &str) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.id == id)
    }

    /// Every frame with `id`, in tag order
    pub fn frames_with_id<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
        self.frames.iter().filter(move |f| f.id == id)
    }

    pub fn frames_with_id_mut<'a>(
        &'a mut self,
        id: &'a str,
    ) -> impl Iterator<Item = &'a mut Frame> + 'a {
        self.frames.iter_mut().filter(move |f| f.id == id)
    }

    /// Append a frame unless it would duplicate a non-repeatable one
    ///
    /// Returns whether the frame was added.
    pub fn push_frame(&mut self, frame: Frame) -> bool {
        if !registry::is_repeatable(self.version, frame.id.as_str())
            && self.frame(frame.id.as_str()).is_some()
        {
            return false;
        }
        self.frames.push(frame);
        true
    }

    /// Add a frame, replacing the existing one when the identifier is not
    /// repeatable
    pub fn set_frame(&mut self, frame: Frame) {
        if !registry::is_repeatable(self.version, frame.id.as_str()) {
            if let Some(existing) = self.frame_mut(frame.id.as_str()) {
                *existing = frame;
                return;
            }
        }
        self.frames.push(frame);
    }

    /// Remove every frame with `id`, returning them
    pub fn remove_frames(&mut self, id: &str) -> Vec<Frame> {
        let (removed, kept): (Vec<Frame>, Vec<Frame>) = std::mem::take(&mut self.frames)
            .into_iter()
            .partition(|f| f.id == id);
        self.frames = kept;
        removed
    }

    pub fn retain(&mut self, keep: impl FnMut(&Frame) -> bool) {
        self.frames.retain(keep);
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame_id::FrameId;

    fn text(id: &str, value: &str) -> Frame {
        Frame::with_text(FrameId::new(id).unwrap(), TagVersion::V2_4, value).unwrap()
    }

    #[test]
    fn non_repeatable_frames_stay_unique() {
        let mut tag = Tag::new(TagVersion::V2_4);
        assert!(tag.push_frame(text("TIT2", "One")));
        assert!(!tag.push_frame(text("TIT2", "Two")));
        assert_eq!(tag.frame("TIT2").unwrap().text(), Some("One"));

        tag.set_frame(text("TIT2", "Three"));
        assert_eq!(tag.len(), 1);
        assert_eq!(tag.frame("TIT2").unwrap().text(), Some("Three"));
    }

    #[test]
    fn repeatable_frames_accumulate() {
        let mut tag = Tag::new(TagVersion::V2_4);
        let id = FrameId::new("TXXX").unwrap();
        tag.set_frame(Frame::empty(id, TagVersion::V2_4));
        tag.set_frame(Frame::empty(id, TagVersion::V2_4));
        assert_eq!(tag.frames_with_id("TXXX").count(), 2);
        assert_eq!(tag.remove_frames("TXXX").len(), 2);
        assert!(tag.is_empty());
    }
}
