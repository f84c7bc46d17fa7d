use serde::{Deserialize, Serialize};

use crate::view_model::{FULL_SKELETON_ROWS, WIDGET_SKELETON_ROWS};

/// How much of the list is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Short preview capped to a handful of rows.
    Widget,
    #[default]
    Full,
}

/// Where the records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    /// In-flight records delivered over the push channel.
    Pending,
    /// Confirmed records fetched page by page.
    #[default]
    Historical,
}

/// Pipeline configuration, fixed for the lifetime of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Mode {
    pub layout: Layout,
    pub feed: Feed,
}

impl Mode {
    pub const fn new(layout: Layout, feed: Feed) -> Self {
        Self { layout, feed }
    }

    pub fn is_widget(self) -> bool {
        self.layout == Layout::Widget
    }

    pub fn is_pending(self) -> bool {
        self.feed == Feed::Pending
    }

    /// Placeholder rows drawn while the first result is outstanding.
    pub fn skeleton_rows(self) -> usize {
        match self.layout {
            Layout::Widget => WIDGET_SKELETON_ROWS,
            Layout::Full => FULL_SKELETON_ROWS,
        }
    }
}
