use std::path::PathBuf;

use anyhow::{Context, bail};
use medview::loader::open_raster;
use medview::{Session, ViewerConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!("usage: medview <input> <output>");
    };

    let config = ViewerConfig::load();
    let mut session = Session::new(&config);
    session.load_image(open_raster(&input));
    if let Some(err) = session.last_error() {
        bail!("Failed to open {}: {err:#}", input.display());
    }

    if let Some(swap) = session.window_level_swap()
        && let Some(prepared) = swap.await
    {
        session.finish_swap(prepared);
    }

    let Some(rendered) = session.render() else {
        bail!("{} has no pixel data", input.display());
    };
    rendered
        .save_with_format(&output, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
