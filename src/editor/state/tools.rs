// SPDX-License-Identifier: MPL-2.0
//! Active tool and teardown of transient interactions.

use crate::editor::EditSession;

/// Exactly one tool is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    #[default]
    Select,
    Zoom,
    Crop,
    Annotate,
    Text,
    Draw,
    Adjust,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Select,
        Tool::Zoom,
        Tool::Crop,
        Tool::Annotate,
        Tool::Text,
        Tool::Draw,
        Tool::Adjust,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Zoom => "zoom",
            Tool::Crop => "crop",
            Tool::Annotate => "annotate",
            Tool::Text => "text",
            Tool::Draw => "draw",
            Tool::Adjust => "adjust",
        }
    }
}

impl EditSession {
    /// Switches tool. The previous tool's transient state is dropped and an
    /// uncommitted quick-adjust preview is reverted; history is untouched.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool == tool {
            return;
        }
        self.cancel_interaction();
        self.discard_preview();
        tracing::debug!(from = self.tool.name(), to = tool.name(), "tool changed");
        self.tool = tool;
        self.touch();
    }

    /// Drops any in-progress crop rectangle, text input, overlay drag,
    /// live stroke or pending annotation. Returns true if anything was
    /// dropped.
    pub fn cancel_interaction(&mut self) -> bool {
        let mut cancelled = self.crop.clear();
        cancelled |= self.text_input.take().is_some();
        cancelled |= self.drag.take().is_some();
        cancelled |= self.pending_annotation.take().is_some();
        cancelled |= self.overlays.cancel_path();
        if cancelled {
            self.touch();
        }
        cancelled
    }

    /// Releases an uncommitted preview and reverts the parameters it was
    /// rendered with to the committed history entry. Without a preview the
    /// parameters are left alone. Returns true if a preview was dropped.
    pub(crate) fn discard_preview(&mut self) -> bool {
        if self.preview.take().is_none() {
            return false;
        }
        match self.history.current().map(|entry| entry.params) {
            Some(params) if params != self.params => {
                self.params = params;
                self.invalidate();
            }
            _ => self.touch(),
        }
        true
    }
}
