use hrseed_core::hr_schema;
use schemars::schema_for;

fn main() {
    let catalog = hr_schema();
    let json = serde_json::to_string_pretty(&catalog).expect("serialize catalog");
    println!("{json}");

    if std::env::args().any(|arg| arg == "--json-schema") {
        let schema = schema_for!(hrseed_core::DatabaseSchema);
        let json = serde_json::to_string_pretty(&schema).expect("serialize json schema");
        println!("{json}");
    }
}
