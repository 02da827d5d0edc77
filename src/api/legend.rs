use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

use super::{DataStyle, LegendOption};

/// Payload of the `clickLegend` event: every key split by checked state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendClickEvent {
    pub checked: Vec<String>,
    pub unchecked: Vec<String>,
}

pub type LegendHandler = Box<dyn FnMut(&LegendClickEvent)>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub key: String,
    pub color: Color,
    pub checked: bool,
    pub count: usize,
}

/// Legend state backing the host's legend widget.
pub struct Legend {
    option: LegendOption,
    entries: Vec<LegendEntry>,
    handler: Option<LegendHandler>,
}

impl fmt::Debug for Legend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Legend")
            .field("option", &self.option)
            .field("entries", &self.entries)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl Legend {
    #[must_use]
    pub fn new<'a>(
        option: LegendOption,
        styles: impl IntoIterator<Item = (&'a String, &'a DataStyle)>,
    ) -> Self {
        let mut legend = Self {
            option,
            entries: Vec::new(),
            handler: None,
        };
        legend.sync(styles);
        legend
    }

    #[must_use]
    pub fn option(&self) -> LegendOption {
        self.option
    }

    #[must_use]
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&LegendEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Adds entries for new styles and refreshes colors; check state survives.
    pub fn sync<'a>(&mut self, styles: impl IntoIterator<Item = (&'a String, &'a DataStyle)>) {
        for (key, style) in styles {
            match self.entries.iter_mut().find(|entry| &entry.key == key) {
                Some(entry) => entry.color = style.legend_color,
                None => {
                    debug!(legend = %key, "legend entry added");
                    self.entries.push(LegendEntry {
                        key: key.clone(),
                        color: style.legend_color,
                        checked: true,
                        count: 0,
                    });
                }
            }
        }
    }

    pub fn set_count(&mut self, key: &str, count: usize) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.count = count;
        }
    }

    #[must_use]
    pub fn count(&self, key: &str) -> Option<usize> {
        self.entry(key).map(|entry| entry.count)
    }

    /// Flips one entry and returns the resulting checked/unchecked split.
    pub fn toggle(&mut self, key: &str) -> ChartResult<LegendClickEvent> {
        let checked = self
            .entry(key)
            .map(|entry| !entry.checked)
            .ok_or_else(|| ChartError::UnknownLegend(key.to_owned()))?;
        self.set_checked(key, checked)
    }

    pub fn set_checked(&mut self, key: &str, checked: bool) -> ChartResult<LegendClickEvent> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.key == key)
            .ok_or_else(|| ChartError::UnknownLegend(key.to_owned()))?;
        entry.checked = checked;
        Ok(self.split())
    }

    pub fn on_click(&mut self, handler: LegendHandler) {
        self.handler = Some(handler);
    }

    pub fn off_click(&mut self) {
        self.handler = None;
    }

    pub fn emit(&mut self, event: &LegendClickEvent) {
        if let Some(handler) = self.handler.as_mut() {
            handler(event);
        }
    }

    pub fn destroy(&mut self) {
        self.handler = None;
        self.entries.clear();
    }

    fn split(&self) -> LegendClickEvent {
        let (checked, unchecked): (Vec<_>, Vec<_>) =
            self.entries.iter().partition(|entry| entry.checked);
        LegendClickEvent {
            checked: checked.into_iter().map(|entry| entry.key.clone()).collect(),
            unchecked: unchecked.into_iter().map(|entry| entry.key.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::Legend;
    use crate::api::{DataShape, DataStyle, LegendOption};
    use crate::error::ChartError;
    use crate::render::Color;

    fn styles() -> IndexMap<String, DataStyle> {
        ["a", "b"]
            .into_iter()
            .map(|key| {
                (
                    key.to_owned(),
                    DataStyle {
                        shape: DataShape::Point,
                        color: Color::BLACK,
                        legend_color: Color::BLACK,
                        radius: 3.0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn toggle_reports_full_split() {
        let mut legend = Legend::new(LegendOption::default(), &styles());
        let event = legend.toggle("a").expect("known legend");
        assert_eq!(event.checked, vec!["b".to_owned()]);
        assert_eq!(event.unchecked, vec!["a".to_owned()]);
        let event = legend.toggle("a").expect("known legend");
        assert_eq!(event.checked.len(), 2);
    }

    #[test]
    fn unknown_key_is_reported() {
        let mut legend = Legend::new(LegendOption::default(), &styles());
        assert!(matches!(
            legend.toggle("zzz"),
            Err(ChartError::UnknownLegend(key)) if key == "zzz"
        ));
    }

    #[test]
    fn sync_keeps_check_state_and_counts() {
        let mut legend = Legend::new(LegendOption::default(), &styles());
        legend.set_checked("b", false).expect("known");
        legend.set_count("b", 7);
        let mut more = styles();
        more.insert("c".to_owned(), more["a"]);
        legend.sync(&more);
        assert_eq!(legend.entries().len(), 3);
        assert_eq!(legend.entry("b").map(|e| (e.checked, e.count)), Some((false, 7)));
    }
}
