use crate::loading::LoadingIndicator;
use crate::map::GeoJsonLayerManager;
use crate::models::{
    cbsa::Cbsa,
    feature::BlockGroupCollection,
    filter::{ActiveFilterSelection, FilterCatalog},
};
use crate::traits::{ControlPanel, JobsSource, MapSurface};
use crate::utils::format::format_count;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Please select a CBSA first")]
    NoCbsaSelected,
}

/// Everything one user session knows.
#[derive(Debug, Default)]
pub struct Session {
    pub cbsas: Vec<Cbsa>,
    pub catalog: FilterCatalog,
    pub current_cbsa: Option<String>,
    pub filters: ActiveFilterSelection,
}

/// One network-backed operation. Hides the loading indicator when dropped,
/// unless a newer operation has been issued since.
struct InFlight<'a> {
    loading: &'a LoadingIndicator,
    latest: &'a Cell<u64>,
    generation: u64,
}

impl InFlight<'_> {
    fn is_current(&self) -> bool {
        self.latest.get() == self.generation
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.is_current() {
            self.loading.hide();
        }
    }
}

/// Drives CBSA selection and filtering on a single task.
///
/// State sits in `Cell`/`RefCell` and is never borrowed across an await, so
/// several entry points may be polled concurrently; only the most recently
/// issued request is allowed to touch the map.
pub struct SelectionController<M: MapSurface, P: ControlPanel> {
    source: Arc<dyn JobsSource>,
    layers: RefCell<GeoJsonLayerManager<M>>,
    panel: RefCell<P>,
    loading: Arc<LoadingIndicator>,
    session: RefCell<Session>,
    generation: Cell<u64>,
}

impl<M: MapSurface, P: ControlPanel> SelectionController<M, P> {
    pub fn new(
        source: Arc<dyn JobsSource>,
        layers: GeoJsonLayerManager<M>,
        panel: P,
        loading: Arc<LoadingIndicator>,
    ) -> Self {
        SelectionController {
            source,
            layers: RefCell::new(layers),
            panel: RefCell::new(panel),
            loading,
            session: RefCell::new(Session::default()),
            generation: Cell::new(0),
        }
    }

    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    pub fn layers(&self) -> Ref<'_, GeoJsonLayerManager<M>> {
        self.layers.borrow()
    }

    /// For pointer events and the zoom-to-extent control.
    pub fn layers_mut(&self) -> RefMut<'_, GeoJsonLayerManager<M>> {
        self.layers.borrow_mut()
    }

    pub fn panel(&self) -> Ref<'_, P> {
        self.panel.borrow()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    fn begin(&self) -> InFlight<'_> {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.loading.show();
        InFlight {
            loading: &self.loading,
            latest: &self.generation,
            generation,
        }
    }

    /// Absent data renders nothing rather than leaving the previous layer up.
    fn render(&self, data: Option<BlockGroupCollection>) {
        let mut layers = self.layers.borrow_mut();
        match data {
            Some(collection) => layers.load(collection),
            None => layers.clear(),
        }
    }

    /// Load the CBSA list and filter catalog for the selectors.
    pub async fn initialize(&self) {
        let cbsas = self.source.list_cbsas().await;
        let catalog = self.source.filter_catalog().await.unwrap_or_default();
        info!(
            "Loaded {} CBSAs and {} employment sectors",
            cbsas.len(),
            catalog.employment_codes.len()
        );
        if catalog.is_empty() {
            warn!("No filter options available");
        }
        self.layers.borrow_mut().set_catalog(catalog.clone());
        let mut session = self.session.borrow_mut();
        session.cbsas = cbsas;
        session.catalog = catalog;
    }

    pub async fn select_cbsa(&self, cbsa_code: &str) {
        {
            let mut session = self.session.borrow_mut();
            session.current_cbsa = Some(cbsa_code.to_string());
            session.filters.clear();
        }
        {
            let mut panel = self.panel.borrow_mut();
            panel.reset_filter_inputs();
            panel.clear_total_jobs();
            panel.set_sections_visible(true);
        }

        let request = self.begin();
        let data = self.source.block_groups(cbsa_code).await;
        if request.is_current() {
            self.render(data);
        } else {
            debug!("Discarding stale block groups for {}", cbsa_code);
        }

        // The summary belongs to the CBSA, so later filter requests don't void it
        if !self.is_selected(cbsa_code) {
            return;
        }
        let detail = self.source.cbsa_detail(cbsa_code).await;
        if !self.is_selected(cbsa_code) {
            debug!("Discarding summary for {}, no longer selected", cbsa_code);
            return;
        }
        if let Some(cbsa) = detail {
            self.panel
                .borrow_mut()
                .set_total_jobs(&format_count(cbsa.total_jobs as f64));
        }
    }

    fn is_selected(&self, cbsa_code: &str) -> bool {
        self.session.borrow().current_cbsa.as_deref() == Some(cbsa_code)
    }

    /// The empty selector option: nothing selected, nothing on the map.
    pub fn deselect(&self) {
        // Invalidate anything still in flight
        self.generation.set(self.generation.get() + 1);
        self.loading.hide();
        self.layers.borrow_mut().clear();
        {
            let mut session = self.session.borrow_mut();
            session.current_cbsa = None;
            session.filters.clear();
        }
        let mut panel = self.panel.borrow_mut();
        panel.clear_total_jobs();
        panel.set_sections_visible(false);
    }

    pub async fn apply_filters(
        &self,
        selection: ActiveFilterSelection,
    ) -> Result<(), SelectionError> {
        let cbsa_code = self
            .session
            .borrow()
            .current_cbsa
            .clone()
            .ok_or(SelectionError::NoCbsaSelected)?;
        self.session.borrow_mut().filters = selection.clone();

        let request = self.begin();
        let data = self
            .source
            .filtered_block_groups(&cbsa_code, &selection)
            .await;
        if !request.is_current() {
            debug!("Discarding stale filtered data for {}", cbsa_code);
            return Ok(());
        }
        self.render(data);
        Ok(())
    }

    /// Reset the filter inputs and reload the unfiltered CBSA.
    pub async fn clear_filters(&self) {
        self.session.borrow_mut().filters.clear();
        self.panel.borrow_mut().reset_filter_inputs();

        let current = self.session.borrow().current_cbsa.clone();
        if let Some(cbsa_code) = current {
            self.select_cbsa(&cbsa_code).await;
        }
    }
}
