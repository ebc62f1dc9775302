use std::rc::Rc;

use planbook::PlanbookError;
use planbook::config::fetch_config;
use planbook::instruments::InstrumentBook;
use planbook::plans::PlanBook;
use planbook::storage::DirStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), PlanbookError> {
    // Initialize tracing subscriber for logging output.
    tracing_subscriber::fmt::init();

    let config = fetch_config()?;
    let store = Rc::new(DirStore::new(&config.data_dir));
    let mut instruments = InstrumentBook::load(Box::new(store.clone()));
    let plans = PlanBook::load(Box::new(store));

    if let Some(url) = &config.sheet_url {
        instruments.set_sheet_url(url);
    }

    let client = reqwest::Client::builder().build()?;
    instruments.startup_sync(&client).await;

    tracing::info!(
        instruments = instruments.list().len(),
        plans = plans.list().len(),
        read_only = instruments.is_read_only(),
        data_dir = %config.data_dir.display(),
        "planbook ready"
    );

    Ok(())
}
