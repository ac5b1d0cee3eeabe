use anyhow::Context;
use clap::Parser;
use jobmap::{
    Config, SelectionController, Source,
    loading::LoadingIndicator,
    map::{
        FeatureStyler, GeoJsonLayerManager,
        terminal::{TerminalMap, TerminalPanel},
    },
    reader::{LocalSource, RemoteSource},
    traits::JobsSource,
    utils::status::{SpinnerSurface, cbsa_table},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();

    let source: Arc<dyn JobsSource> = match config.source() {
        Source::Local(folder) => {
            info!("Reading exported data from {:?}", folder);
            Arc::new(LocalSource::new(folder))
        }
        Source::Remote { base_url } => {
            info!("Using jobs API at {}", base_url);
            Arc::new(RemoteSource::new(&base_url)?)
        }
    };

    let styler = FeatureStyler::new(config.colour_scale().context("invalid colour settings")?);
    let legend = styler.scale().samples(10);
    let loading = Arc::new(LoadingIndicator::new(
        Arc::new(SpinnerSurface::default()),
        config.loader_delay(),
    ));
    let layers = GeoJsonLayerManager::new(
        TerminalMap::new(config.width, config.height, legend, config.top),
        styler,
        loading.clone(),
    )
    .with_padding(config.fit_padding);
    let controller = SelectionController::new(source, layers, TerminalPanel::default(), loading);

    controller.initialize().await;
    if config.list {
        println!("{}", cbsa_table(&controller.session().cbsas));
    }

    let Some(cbsa_code) = config.cbsa.as_deref() else {
        if !config.list {
            warn!("No --cbsa given; nothing to show");
        }
        return Ok(());
    };
    controller.select_cbsa(cbsa_code).await;

    let filters = config.filters();
    if !filters.is_empty() {
        if let Err(err) = controller.apply_filters(filters).await {
            println!("⚠️  {}", err);
        }
    }

    if let Some(geoid) = config.inspect.as_deref() {
        if !controller.layers_mut().pointer_enter(geoid) {
            warn!("Block group {} is not on the map", geoid);
        }
    }

    Ok(())
}
