//! Frame locator templates.
//!
//! A viewer is configured with a single locator template containing a
//! `$FRAME` placeholder; each frame's resource locator is derived by
//! substituting the 1-based frame number.

use tracing::warn;

pub const FRAME_PLACEHOLDER: &str = "$FRAME";

/// One frame the host is asked to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    /// 0-based frame index
    pub index: usize,
    /// Resolved resource locator (URL or path)
    pub locator: String,
}

/// Locator template with a `$FRAME` placeholder.
#[derive(Debug, Clone)]
pub struct SourceTemplate {
    template: String,
}

impl SourceTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        if !template.contains(FRAME_PLACEHOLDER) {
            warn!("source template contains no {FRAME_PLACEHOLDER} placeholder: {template}");
        }
        Self { template }
    }

    /// Resolve the locator for a 0-based frame index.
    ///
    /// Frame numbering in locators is 1-based: index 0 is frame 1.
    pub fn locator_for(&self, index: usize) -> String {
        self.template
            .replace(FRAME_PLACEHOLDER, &(index + 1).to_string())
    }

    /// Expand a fetch plan into per-frame requests.
    pub fn requests(&self, indices: impl IntoIterator<Item = usize>) -> Vec<FrameRequest> {
        indices
            .into_iter()
            .map(|index| FrameRequest {
                index,
                locator: self.locator_for(index),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_is_one_based() {
        let template = SourceTemplate::new("https://example.com/car/$FRAME.jpg");
        assert_eq!(template.locator_for(0), "https://example.com/car/1.jpg");
        assert_eq!(template.locator_for(11), "https://example.com/car/12.jpg");
    }

    #[test]
    fn test_requests_follow_plan_order() {
        let template = SourceTemplate::new("frames/$FRAME.png");
        let requests = template.requests([1, 3, 5]);
        assert_eq!(
            requests,
            vec![
                FrameRequest { index: 1, locator: "frames/2.png".into() },
                FrameRequest { index: 3, locator: "frames/4.png".into() },
                FrameRequest { index: 5, locator: "frames/6.png".into() },
            ]
        );
    }

    #[test]
    fn test_template_without_placeholder_is_constant() {
        let template = SourceTemplate::new("frames/static.png");
        assert_eq!(template.locator_for(7), "frames/static.png");
    }
}
