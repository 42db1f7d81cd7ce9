use env_logger::Env;

mod ui;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    ui::run_explainer_window();
}
