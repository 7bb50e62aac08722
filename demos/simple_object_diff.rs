fn main() {
    let reference = serde_json::json!({
        "server": {
            "host": "0.0.0.0",
            "port": 8080
        },
        "features": ["auth", "metrics"]
    });

    let sample = serde_json::json!({
        "server": {
            "host": "0.0.0.0",
            "port": 8081,
            "tls": true
        },
        "features": ["auth"]
    });

    let diff = cfgdiff::DiffBuilder::default()
        .build()
        .unwrap();
    let differences = diff.compare(&reference, &sample).unwrap();

    serde_json::to_writer_pretty(std::io::stdout(), &differences).unwrap();
}
