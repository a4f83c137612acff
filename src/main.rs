fn main() {
    alpha_chat::config::load_dotenv();
    let _ = tracing_subscriber::fmt().try_init();
    dioxus::launch(alpha_chat::ui::App);
}
