use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use tempfile::TempDir;

use periscope_core::config::Config;
use periscope_core::error::Error;
use periscope_core::traits::SyncSource;
use periscope_core::types::{SearchResult, SourceDescriptor, SourceKind};

#[derive(Debug, Default, Deserialize, PartialEq)]
struct Section {
    #[serde(default)]
    capacity: usize,
    #[serde(default)]
    label: String,
}

#[test]
fn config_reads_section_from_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[ranking]\ncapacity = 42\nlabel = \"x\"\n").unwrap();

    let config = Config::load_from(tmp.path()).expect("load");
    let section: Section = config.get("ranking").expect("section");

    assert_eq!(section, Section { capacity: 42, label: "x".to_string() });
}

#[test]
fn config_missing_section_falls_back_to_default() {
    let tmp = TempDir::new().unwrap();
    let config = Config::load_from(tmp.path()).expect("load without files");

    let section: Section = config.get_or_default("ranking").expect("default section");
    assert_eq!(section, Section::default());
    assert!(config.get::<Section>("ranking").is_err(), "strict get reports the missing key");
}

#[test]
fn config_malformed_section_is_an_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[ranking]\ncapacity = \"many\"\n").unwrap();

    let config = Config::load_from(tmp.path()).expect("load");
    assert!(config.get_or_default::<Section>("ranking").is_err());
}

#[test]
fn search_result_runs_its_action_each_time_it_is_invoked() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let result = SearchResult::new("gh", "GitHub", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .with_icon("ion-link");

    assert_eq!(result.id(), "gh");
    assert_eq!(result.icon(), Some("ion-link"));
    result.run().expect("action");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let copy = result.clone();
    assert_eq!(copy, result, "clones share identity");
}

struct Failing;

impl SyncSource for Failing {
    fn title(&self) -> &str { "Broken" }
    fn search(&self, _query: &str) -> periscope_core::error::Result<Vec<SearchResult>> {
        Err(Error::search_failed("Broken", "backend offline"))
    }
}

#[test]
fn descriptor_exposes_title_and_kind() {
    let descriptor = SourceDescriptor::Sync(Arc::new(Failing));
    assert_eq!(descriptor.title(), "Broken");
    assert_eq!(descriptor.kind(), SourceKind::Sync);

    let SourceDescriptor::Sync(source) = descriptor else { panic!("sync descriptor") };
    let err = source.search("q").unwrap_err();
    assert!(matches!(err, Error::SourceSearchFailed { .. }));
    assert!(err.to_string().contains("backend offline"));
}
