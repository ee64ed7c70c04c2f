use crate::{
    annotations::{
        annotation::Annotation,
        view::{materialize, ViewDisposition, ViewSpec},
    },
    channel::events::{EventSink, MapEvent},
    core::geo::LatLng,
    prelude::HashMap,
    rendering::surface::{MapSurface, SurfaceCommand, ViewHandle},
};

/// An annotation currently on the map, with the view it is shown by
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedAnnotation {
    annotation: Annotation,
    handle: ViewHandle,
    view: ViewSpec,
    selected: bool,
}

impl DisplayedAnnotation {
    pub fn annotation(&self) -> &Annotation {
        &self.annotation
    }

    pub fn handle(&self) -> ViewHandle {
        self.handle
    }

    pub fn view(&self) -> &ViewSpec {
        &self.view
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// A drag or tap is waiting to absorb the next change for this id
    pub fn is_drag_suppressed(&self) -> bool {
        self.annotation.was_dragged
    }
}

/// What a reconciliation pass did, per annotation id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    /// Icon type changed, so the old view was destroyed and a new one created
    pub recreated: Vec<String>,
    /// Dropped because a drag was pending for the id
    pub suppressed: Vec<String>,
    pub unchanged: Vec<String>,
    pub removed: Vec<String>,
    /// Referenced an id that is not displayed
    pub ignored: Vec<String>,
}

impl ReconcileReport {
    pub fn merge(&mut self, other: ReconcileReport) {
        self.added.extend(other.added);
        self.updated.extend(other.updated);
        self.recreated.extend(other.recreated);
        self.suppressed.extend(other.suppressed);
        self.unchanged.extend(other.unchanged);
        self.removed.extend(other.removed);
        self.ignored.extend(other.ignored);
    }

    /// True when the pass left every view as it was
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
            && self.updated.is_empty()
            && self.recreated.is_empty()
            && self.removed.is_empty()
    }
}

/// Keeps the displayed annotations in line with what the controller asks for.
///
/// At most one annotation is displayed per id. Batches are applied
/// sequentially, so the last entry for an id within a batch wins.
#[derive(Debug, Default)]
pub struct AnnotationController {
    live: HashMap<String, DisplayedAnnotation>,
    /// Ids in the order they were first displayed
    order: Vec<String>,
    next_handle: u64,
    events: EventSink,
}

impl AnnotationController {
    pub fn new(events: EventSink) -> Self {
        Self {
            live: HashMap::default(),
            order: Vec::new(),
            next_handle: 0,
            events,
        }
    }

    /// Displays every annotation. An id that is already shown is replaced.
    pub fn apply_adds(
        &mut self,
        annotations: Vec<Annotation>,
        surface: &mut dyn MapSurface,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for annotation in annotations {
            let id = annotation.id().to_string();
            if let Some(existing) = self.live.remove(&id) {
                log::debug!("annotation '{}' added again, replacing {}", id, existing.handle);
                surface.apply(SurfaceCommand::RemoveView {
                    handle: existing.handle,
                    annotation_id: id.clone(),
                });
            } else {
                self.order.push(id.clone());
            }

            let (_, view) = materialize(&annotation, surface.view_frame(&annotation), None);
            let displayed = self.create_view(annotation, view, surface);
            self.live.insert(id.clone(), displayed);
            report.added.push(id);
        }

        report
    }

    /// Applies desired states to the annotations with matching ids.
    ///
    /// A pending drag absorbs exactly one change for its id. Unknown ids are ignored.
    pub fn apply_changes(
        &mut self,
        annotations: Vec<Annotation>,
        surface: &mut dyn MapSurface,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for desired in annotations {
            let id = desired.id().to_string();
            let Some(entry) = self.live.get_mut(&id) else {
                log::debug!("change for unknown annotation '{}' ignored", id);
                report.ignored.push(id);
                continue;
            };

            if entry.annotation.was_dragged {
                log::debug!("change for '{}' dropped, user drag wins", id);
                entry.annotation.was_dragged = false;
                report.suppressed.push(id);
                continue;
            }

            if entry.annotation == desired {
                report.unchanged.push(id);
                continue;
            }

            let previous_type = entry.annotation.icon_type();
            let frame = surface.view_frame(&desired);
            let (disposition, view) = materialize(&desired, frame, Some(previous_type));

            if disposition == ViewDisposition::Create {
                // The widget class is fixed at creation, so a new view is needed.
                log::debug!(
                    "annotation '{}' changed icon {} -> {}, recreating",
                    id,
                    previous_type,
                    desired.icon_type()
                );
                let (old_handle, was_selected) = (entry.handle, entry.selected);
                surface.apply(SurfaceCommand::RemoveView {
                    handle: old_handle,
                    annotation_id: id.clone(),
                });
                let mut displayed = self.create_view(desired, view, surface);
                if was_selected {
                    displayed.selected = true;
                    surface.apply(SurfaceCommand::SelectView {
                        handle: displayed.handle,
                    });
                }
                self.live.insert(id.clone(), displayed);
                report.recreated.push(id);
                continue;
            }

            entry.annotation.assign_from(desired);
            entry.view = view;
            surface.apply(SurfaceCommand::UpdateView {
                handle: entry.handle,
                annotation_id: id.clone(),
                coordinate: entry.annotation.coordinate,
                title: entry.annotation.title.clone(),
                spec: entry.view.clone(),
            });
            report.updated.push(id);
        }

        report
    }

    /// Removes the annotations with these ids; unknown ids are ignored
    pub fn apply_removals(&mut self, ids: &[String], surface: &mut dyn MapSurface) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        for id in ids {
            match self.live.remove(id) {
                Some(displayed) => {
                    self.order.retain(|existing| existing != id);
                    surface.apply(SurfaceCommand::RemoveView {
                        handle: displayed.handle,
                        annotation_id: id.clone(),
                    });
                    report.removed.push(id.clone());
                }
                None => {
                    log::debug!("removal of unknown annotation '{}' ignored", id);
                    report.ignored.push(id.clone());
                }
            }
        }

        report
    }

    pub fn remove_all(&mut self, surface: &mut dyn MapSurface) -> ReconcileReport {
        let ids = std::mem::take(&mut self.order);
        self.apply_removals(&ids, surface)
    }

    /// The user started dragging: hold off the next change for this id and tell the controller
    pub fn on_drag_start(&mut self, id: &str) -> bool {
        let Some(entry) = self.live.get_mut(id) else {
            return false;
        };
        entry.annotation.was_dragged = true;
        self.events.emit(MapEvent::AnnotationTapped {
            annotation_id: id.to_string(),
        });
        true
    }

    /// Taps arm the same one-shot suppression as drags
    pub fn on_tap(&mut self, id: &str) -> bool {
        self.on_drag_start(id)
    }

    /// The user dropped a dragged annotation at `coordinate`
    pub fn on_drag_end(&mut self, id: &str, coordinate: LatLng) -> bool {
        let Some(entry) = self.live.get_mut(id) else {
            return false;
        };
        entry.annotation.coordinate = coordinate;
        self.events.emit(MapEvent::AnnotationDragEnded {
            annotation_id: id.to_string(),
            position: coordinate,
        });
        true
    }

    pub fn select(&mut self, id: &str, surface: &mut dyn MapSurface) -> bool {
        self.set_selected(id, true, surface)
    }

    pub fn deselect(&mut self, id: &str, surface: &mut dyn MapSurface) -> bool {
        self.set_selected(id, false, surface)
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.live.get(id).map(|d| d.selected).unwrap_or(false)
    }

    pub fn get(&self, id: &str) -> Option<&DisplayedAnnotation> {
        self.live.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.live.contains_key(id)
    }

    /// Displayed annotations in the order they were first shown
    pub fn annotations(&self) -> Vec<&DisplayedAnnotation> {
        self.order
            .iter()
            .filter_map(|id| self.live.get(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn set_selected(&mut self, id: &str, selected: bool, surface: &mut dyn MapSurface) -> bool {
        let Some(entry) = self.live.get_mut(id) else {
            log::debug!("selection change for unknown annotation '{}' ignored", id);
            return false;
        };
        entry.selected = selected;
        let command = if selected {
            SurfaceCommand::SelectView {
                handle: entry.handle,
            }
        } else {
            SurfaceCommand::DeselectView {
                handle: entry.handle,
            }
        };
        surface.apply(command);
        true
    }

    fn create_view(
        &mut self,
        annotation: Annotation,
        view: ViewSpec,
        surface: &mut dyn MapSurface,
    ) -> DisplayedAnnotation {
        let handle = ViewHandle(self.next_handle);
        self.next_handle += 1;

        surface.apply(SurfaceCommand::CreateView {
            handle,
            annotation_id: annotation.id().to_string(),
            coordinate: annotation.coordinate,
            title: annotation.title.clone(),
            spec: view.clone(),
        });

        DisplayedAnnotation {
            annotation,
            handle,
            view,
            selected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::annotation::AnnotationIcon;
    use crate::channel::events::event_channel;
    use crate::rendering::surface::RecordingSurface;

    fn pin(id: &str, lat: f64, lng: f64) -> Annotation {
        Annotation::new(id, LatLng::new(lat, lng))
    }

    #[test]
    fn test_add_then_change_keeps_one_annotation() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();

        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);
        let report = controller.apply_changes(vec![pin("a1", 1.0, 1.0)], &mut surface);

        assert_eq!(report.updated, vec!["a1"]);
        assert_eq!(controller.len(), 1);
        let displayed = controller.get("a1").unwrap();
        assert_eq!(displayed.annotation().coordinate, LatLng::new(1.0, 1.0));
        assert_eq!(displayed.handle(), ViewHandle(0));
    }

    #[test]
    fn test_identical_change_is_noop() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 3.0, 4.0).with_title("Home")], &mut surface);
        let view_before = controller.get("a1").unwrap().view().clone();
        surface.take_commands();

        let report = controller.apply_changes(vec![pin("a1", 3.0, 4.0).with_title("Home")], &mut surface);

        assert!(report.is_noop());
        assert_eq!(report.unchanged, vec!["a1"]);
        assert!(surface.commands().is_empty());
        assert_eq!(controller.get("a1").unwrap().view(), &view_before);
    }

    #[test]
    fn test_icon_type_change_recreates_view() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);
        surface.take_commands();

        let marker = pin("a1", 0.0, 0.0).with_icon(AnnotationIcon::Marker);
        let report = controller.apply_changes(vec![marker], &mut surface);

        assert_eq!(report.recreated, vec!["a1"]);
        assert!(report.updated.is_empty());
        let commands = surface.take_commands();
        assert!(matches!(commands[0], SurfaceCommand::RemoveView { handle: ViewHandle(0), .. }));
        assert!(matches!(commands[1], SurfaceCommand::CreateView { handle: ViewHandle(1), .. }));
        assert_eq!(controller.len(), 1);
        assert_eq!(controller.get("a1").unwrap().handle(), ViewHandle(1));
    }

    #[test]
    fn test_recreated_view_stays_selected() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);
        controller.select("a1", &mut surface);
        surface.take_commands();

        let marker = pin("a1", 0.0, 0.0).with_icon(AnnotationIcon::Marker);
        controller.apply_changes(vec![marker], &mut surface);

        assert!(controller.is_selected("a1"));
        let commands = surface.take_commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[2], SurfaceCommand::SelectView { handle: ViewHandle(1) }));
    }

    #[test]
    fn test_custom_image_switch_recreates_view() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        let asset = AnnotationIcon::Asset {
            key: "flutter_assets/a.png".to_string(),
            scale: 1.0,
        };
        controller.apply_adds(vec![pin("a1", 0.0, 0.0).with_icon(asset)], &mut surface);

        let bytes = AnnotationIcon::Bytes {
            data: vec![1, 2],
            scale: 1.0,
        };
        let report = controller.apply_changes(vec![pin("a1", 0.0, 0.0).with_icon(bytes)], &mut surface);
        assert_eq!(report.recreated, vec!["a1"]);
        assert_eq!(controller.get("a1").unwrap().handle(), ViewHandle(1));
    }

    #[test]
    fn test_drag_absorbs_exactly_one_change() {
        let (events, rx) = event_channel();
        let mut controller = AnnotationController::new(events);
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0).with_draggable(true)], &mut surface);

        assert!(controller.on_drag_start("a1"));
        assert_eq!(
            rx.try_recv().unwrap(),
            MapEvent::AnnotationTapped {
                annotation_id: "a1".to_string()
            }
        );

        let first = controller.apply_changes(vec![pin("a1", 9.0, 9.0)], &mut surface);
        assert_eq!(first.suppressed, vec!["a1"]);
        assert_eq!(controller.get("a1").unwrap().annotation().coordinate, LatLng::new(0.0, 0.0));
        assert!(!controller.get("a1").unwrap().is_drag_suppressed());

        let second = controller.apply_changes(vec![pin("a1", 9.0, 9.0)], &mut surface);
        assert_eq!(second.updated, vec!["a1"]);
        assert_eq!(controller.get("a1").unwrap().annotation().coordinate, LatLng::new(9.0, 9.0));
    }

    #[test]
    fn test_last_change_in_batch_wins() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);

        controller.apply_changes(vec![pin("a1", 1.0, 1.0), pin("a1", 2.0, 2.0)], &mut surface);
        assert_eq!(controller.get("a1").unwrap().annotation().coordinate, LatLng::new(2.0, 2.0));
    }

    #[test]
    fn test_duplicate_add_overwrites() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0), pin("a2", 0.0, 0.0)], &mut surface);
        controller.apply_adds(vec![pin("a1", 5.0, 5.0)], &mut surface);

        assert_eq!(controller.len(), 2);
        assert_eq!(controller.get("a1").unwrap().annotation().coordinate, LatLng::new(5.0, 5.0));
        let ids: Vec<&str> = controller.annotations().iter().map(|d| d.annotation().id()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);
        surface.take_commands();

        let report = controller.apply_removals(&["missing".to_string()], &mut surface);
        assert_eq!(report.ignored, vec!["missing"]);
        assert!(surface.commands().is_empty());
        assert_eq!(controller.len(), 1);
    }

    #[test]
    fn test_change_unknown_id_is_ignored() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        let report = controller.apply_changes(vec![pin("ghost", 1.0, 1.0)], &mut surface);
        assert_eq!(report.ignored, vec!["ghost"]);
        assert!(controller.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0), pin("a2", 1.0, 1.0)], &mut surface);

        let report = controller.remove_all(&mut surface);
        assert_eq!(report.removed, vec!["a1", "a2"]);
        assert!(controller.is_empty());
        assert!(controller.annotations().is_empty());
    }

    #[test]
    fn test_selection_passes_through() {
        let mut controller = AnnotationController::default();
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);

        assert!(controller.select("a1", &mut surface));
        assert!(controller.is_selected("a1"));
        assert!(controller.deselect("a1", &mut surface));
        assert!(!controller.is_selected("a1"));
        assert!(!controller.select("missing", &mut surface));
        assert!(!controller.is_selected("missing"));
    }

    #[test]
    fn test_drag_end_moves_annotation() {
        let (events, rx) = event_channel();
        let mut controller = AnnotationController::new(events);
        let mut surface = RecordingSurface::new();
        controller.apply_adds(vec![pin("a1", 0.0, 0.0)], &mut surface);

        controller.on_drag_start("a1");
        assert!(controller.on_drag_end("a1", LatLng::new(2.0, 3.0)));
        let displayed = controller.get("a1").unwrap();
        assert_eq!(displayed.annotation().coordinate, LatLng::new(2.0, 3.0));
        assert!(displayed.is_drag_suppressed());

        let events: Vec<MapEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(!controller.on_drag_end("missing", LatLng::default()));
    }
}
