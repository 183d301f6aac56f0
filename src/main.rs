/// Entry point for the demo.
///
/// Takes an optional path to a TOML config file as its only argument.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    colormapped_spheres::run(std::env::args().nth(1))
}
