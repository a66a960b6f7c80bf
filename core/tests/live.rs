//! Smoke tests against the real Sentino API.
//!
//! Ignored by default. Run with
//! `SENTINO_API_KEY=... cargo test -p sentino-core --test live -- --ignored`.

use sentino_core::SentinoClient;

fn client() -> SentinoClient {
    let key = std::env::var("SENTINO_API_KEY").expect("SENTINO_API_KEY must be set");
    SentinoClient::new(&key).unwrap()
}

#[test]
#[ignore = "needs SENTINO_API_KEY and network access"]
fn score_text() {
    let scores = client().score_text("I am a happy person.").unwrap();
    assert!(!scores.is_null());
}

#[test]
#[ignore = "needs SENTINO_API_KEY and network access"]
fn get_inventories() {
    let inventories = client().get_inventories().unwrap();
    assert!(!inventories.is_null());
}

#[test]
#[ignore = "needs SENTINO_API_KEY and network access"]
fn classify() {
    let classification = client().classify("I am brave.").unwrap();
    println!("{classification}");
    assert!(!classification.is_null());
}
