use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::profile::store::{ProfileSnapshot, ProfileStore};
use crate::render::svg::paint;
use crate::templates::{render, RenderedDocument, TemplateId};

/// One rendered state of the surface.
#[derive(Debug)]
pub struct RenderedView {
    pub template: TemplateId,
    /// Store revision this view was rendered from.
    pub revision: u64,
    pub document: RenderedDocument,
    pub svg: String,
    pub width: f32,
    pub height: f32,
}

/// Holds the selected template and the last rendered view.
///
/// A view is served from the cache only when both its revision and its
/// template match the current ones, so a template switch or profile edit is
/// visible on the next read.
#[derive(Debug, Default)]
pub struct RenderSurface {
    template: Mutex<TemplateId>,
    cached: Mutex<Option<Arc<RenderedView>>>,
}

impl RenderSurface {
    pub fn new(template: TemplateId) -> Self {
        Self {
            template: Mutex::new(template),
            cached: Mutex::new(None),
        }
    }

    pub fn template(&self) -> TemplateId {
        *self.template.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn select_template(&self, template: TemplateId) {
        *self.template.lock().unwrap_or_else(|e| e.into_inner()) = template;
    }

    /// View of the store's current snapshot in the selected template.
    pub fn current(&self, store: &ProfileStore) -> Arc<RenderedView> {
        self.view_of(&store.snapshot(), self.template())
    }

    /// View of an explicit snapshot and template. Does not change the selection.
    pub fn view_of(&self, snapshot: &ProfileSnapshot, template: TemplateId) -> Arc<RenderedView> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(view) = cached.as_ref() {
            if view.revision == snapshot.revision && view.template == template {
                return Arc::clone(view);
            }
        }

        debug!(
            "Rendering revision {} with template {template}",
            snapshot.revision
        );
        let view = Arc::new(render_view(snapshot, template));
        *cached = Some(Arc::clone(&view));
        view
    }
}

pub fn render_view(snapshot: &ProfileSnapshot, template: TemplateId) -> RenderedView {
    let document = render(template, &snapshot.profile);
    let page = paint(&document);
    RenderedView {
        template,
        revision: snapshot.revision,
        document,
        svg: page.svg,
        width: page.width,
        height: page.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::model::Profile;
    use crate::profile::store::ProfileEdit;

    fn store_with_summary(text: &str) -> ProfileStore {
        let store = ProfileStore::new(Profile::default());
        store
            .apply(ProfileEdit::SetSummary {
                summary: text.to_string(),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_defaults_to_classic() {
        let surface = RenderSurface::default();
        let store = ProfileStore::new(Profile::default());
        assert_eq!(surface.current(&store).template, TemplateId::Classic);
    }

    #[test]
    fn test_unchanged_state_reuses_view() {
        let surface = RenderSurface::default();
        let store = store_with_summary("hello");
        let first = surface.current(&store);
        let second = surface.current(&store);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_template_switch_rerenders() {
        let surface = RenderSurface::default();
        let store = store_with_summary("hello");
        let classic = surface.current(&store);

        surface.select_template(TemplateId::Creative);
        let creative = surface.current(&store);

        assert_eq!(creative.template, TemplateId::Creative);
        assert_ne!(classic.svg, creative.svg);
        assert_eq!(creative.document.template, TemplateId::Creative);
    }

    #[test]
    fn test_profile_edit_rerenders() {
        let surface = RenderSurface::default();
        let store = store_with_summary("before edit");
        assert!(surface.current(&store).svg.contains("before edit"));

        store
            .apply(ProfileEdit::SetSummary {
                summary: "after edit".to_string(),
            })
            .unwrap();

        let view = surface.current(&store);
        assert_eq!(view.revision, 2);
        assert!(view.svg.contains("after edit"));
        assert!(!view.svg.contains("before edit"));
    }

    #[test]
    fn test_view_of_leaves_selection_alone() {
        let surface = RenderSurface::new(TemplateId::Modern);
        let store = store_with_summary("x");
        let view = surface.view_of(&store.snapshot(), TemplateId::TwoColumn);
        assert_eq!(view.template, TemplateId::TwoColumn);
        assert_eq!(surface.template(), TemplateId::Modern);
    }
}
