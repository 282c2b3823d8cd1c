//! Dashboard aggregate and its widget instances.
//!
//! A dashboard exclusively owns its widgets. Each widget keeps a lookup-only
//! back-reference (`dashboard_id`) to the dashboard that currently holds it.
//! Widget identity is the database id.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, OptionMap};

/// A widget placed on a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: DbId,
    pub dashboard_id: Option<DbId>,
    /// Name of the widget configuration this instance was created from.
    pub name: String,
    /// Raw stored option values.
    #[serde(default)]
    pub options: OptionMap,
    /// Position among the widgets of the same column (ascending).
    pub position: i32,
    pub layout_column: i32,
    pub expanded: bool,
}

impl Widget {
    pub fn new(id: DbId, name: impl Into<String>) -> Self {
        Self {
            id,
            dashboard_id: None,
            name: name.into(),
            options: OptionMap::new(),
            position: 0,
            layout_column: 0,
            expanded: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: DbId,
    /// Unique across all dashboards.
    pub name: String,
    pub label: String,
    pub owner_id: Option<DbId>,
    widgets: Vec<Widget>,
}

/// New layout slot of a widget moved by [`Dashboard::shift_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChange {
    pub widget_id: DbId,
    pub layout_column: i32,
    pub position: i32,
}

impl Dashboard {
    pub fn new(id: DbId, name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            label: label.into(),
            owner_id: None,
            widgets: Vec::new(),
        }
    }

    /// Build a dashboard from persisted widgets, attaching each one.
    pub fn with_widgets(mut self, widgets: impl IntoIterator<Item = Widget>) -> Self {
        for widget in widgets {
            self.add_widget(widget);
        }
        self
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Append `widget` unless a widget with the same id is already present.
    pub fn add_widget(&mut self, mut widget: Widget) -> &mut Self {
        if !self.has_widget(&widget) {
            widget.dashboard_id = Some(self.id);
            self.widgets.push(widget);
        }
        self
    }

    /// Remove the widget with the same id. Returns whether one was removed.
    pub fn remove_widget(&mut self, widget: &Widget) -> bool {
        match self.widgets.iter().position(|w| w.id == widget.id) {
            Some(index) => {
                self.widgets.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_widget(&self, widget: &Widget) -> bool {
        self.widgets.iter().any(|w| w.id == widget.id)
    }

    pub fn reset_widgets(&mut self) -> &mut Self {
        self.widgets.clear();
        self
    }

    /// Widgets of `column`, ordered by position.
    pub fn widgets_in_column(&self, column: i32) -> Vec<&Widget> {
        let mut widgets: Vec<&Widget> = self
            .widgets
            .iter()
            .filter(|w| w.layout_column == column)
            .collect();
        widgets.sort_by_key(|w| w.position);
        widgets
    }

    /// Push every widget of `column` down by one to free its top slot.
    ///
    /// Returns the layout changes so they can be persisted together with the
    /// widget that takes the freed slot.
    pub fn shift_column(&mut self, column: i32) -> Vec<LayoutChange> {
        self.widgets
            .iter_mut()
            .filter(|w| w.layout_column == column)
            .map(|existing| {
                existing.position += 1;
                LayoutChange {
                    widget_id: existing.id,
                    layout_column: column,
                    position: existing.position,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: DbId, position: i32) -> Widget {
        Widget {
            position,
            ..Widget::new(id, "quick_launchpad")
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(7, "main", "Main dashboard")
    }

    #[test]
    fn add_sets_back_reference() {
        let mut d = dashboard();
        d.add_widget(widget(1, 0));
        assert_eq!(d.widgets()[0].dashboard_id, Some(7));
    }

    #[test]
    fn add_is_idempotent() {
        let mut d = dashboard();
        d.add_widget(widget(1, 0));
        d.add_widget(widget(1, 0));
        assert_eq!(d.widgets().len(), 1);
    }

    #[test]
    fn remove_reports_whether_removed() {
        let w1 = widget(1, 0);
        let w2 = widget(2, 1);
        let mut d = dashboard().with_widgets([w1.clone(), w2.clone()]);

        assert!(d.remove_widget(&w1));
        assert_eq!(d.widgets().len(), 1);
        assert_eq!(d.widgets()[0].id, 2);
        assert!(!d.remove_widget(&w1));
        assert!(d.has_widget(&w2));
        assert!(!d.has_widget(&w1));
    }

    #[test]
    fn reset_clears_everything() {
        let mut d = dashboard().with_widgets([widget(1, 0), widget(2, 1)]);
        d.reset_widgets();
        assert!(d.widgets().is_empty());
    }

    #[test]
    fn shift_column_frees_top_slot() {
        let mut left = widget(1, 0);
        left.layout_column = 0;
        let mut right_top = widget(2, 0);
        right_top.layout_column = 1;
        let mut right_bottom = widget(3, 1);
        right_bottom.layout_column = 1;
        let mut d = dashboard().with_widgets([left, right_top, right_bottom]);

        let changes = d.shift_column(1);
        assert_eq!(
            changes,
            vec![
                LayoutChange { widget_id: 2, layout_column: 1, position: 1 },
                LayoutChange { widget_id: 3, layout_column: 1, position: 2 },
            ]
        );

        let mut placed = Widget::new(4, "recent_emails");
        placed.layout_column = 1;
        d.add_widget(placed);

        let column: Vec<DbId> = d.widgets_in_column(1).iter().map(|w| w.id).collect();
        assert_eq!(column, vec![4, 2, 3]);
        assert_eq!(d.widgets_in_column(0)[0].position, 0);
        assert_eq!(d.widgets().last().unwrap().dashboard_id, Some(7));
    }

    #[test]
    fn shift_empty_column_changes_nothing() {
        let mut d = dashboard().with_widgets([widget(1, 0)]);
        assert!(d.shift_column(3).is_empty());
        assert_eq!(d.widgets()[0].position, 0);
    }
}
