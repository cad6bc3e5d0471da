/// Example program to print the loaded configuration
///
/// Run with: cargo run -p quire-config --example print_config

fn main() {
    // Load configuration from quire.toml
    let config = quire_config::QuireConfig::load();

    println!("=== Quire Configuration ===\n");

    println!("Text Settings:");
    println!("  Font Family: {:?}", config.text.font_family);
    println!("  Font Size: {}", config.text.font_size);
    println!("  Tab Width: {}", config.text.tab_width);
    println!("  Password: {} (mask {:?})", config.text.password, config.text.password_mask);
    println!("  Line Height: {:?}", config.text.line_height);
    println!("  Line Spacing: {}", config.text.line_spacing);
    println!();

    println!("Layout Settings:");
    println!("  Multiline: {}", config.layout.multiline);
    println!("  Wrap: {}", config.layout.wrap);
    println!("  HAlign: {:?}", config.layout.halign);
    println!("  Base Direction: {:?}", config.layout.base_direction);
    println!("  Padding: {:?}", config.layout.padding);
    println!();

    println!("Cache Settings:");
    println!("  Width Timeout: {:?}s", config.cache.width_timeout_secs);
    println!("  Max Entries: {}", config.cache.max_entries);
    println!();

    println!("History Settings:");
    println!("  Undo Limit: {}", config.history.undo_limit);
    println!("  Group Typing: {}", config.history.group_typing);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
