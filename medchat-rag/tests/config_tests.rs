use medchat_rag::{RagConfig, RagError};

#[test]
fn defaults_reflect_the_service_limits() {
    let config = RagConfig::default();
    assert_eq!(config.chunk_max_chars, 1000);
    assert_eq!(config.chunk_overlap_chars, 200);
    assert_eq!(config.boundary_lookback_chars, 100);
    assert_eq!(config.embed_batch_size, 2000);
    assert_eq!(config.upsert_batch_size, 100);
    assert_eq!(config.top_k, 3);
    assert_eq!(config.snippet_max_chars, 200);
}

#[test]
fn default_configuration_validates() {
    assert!(RagConfig::builder().build().is_ok());
}

#[test]
fn overlap_at_or_above_chunk_size_is_rejected() {
    let result = RagConfig::builder()
        .chunk_max_chars(100)
        .chunk_overlap_chars(100)
        .build();
    assert!(matches!(result, Err(RagError::InvalidConfiguration(_))));
}

#[test]
fn zero_batch_sizes_are_rejected() {
    assert!(matches!(
        RagConfig::builder().embed_batch_size(0).build(),
        Err(RagError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        RagConfig::builder().upsert_batch_size(0).build(),
        Err(RagError::InvalidConfiguration(_))
    ));
}

#[test]
fn zero_top_k_is_rejected() {
    assert!(matches!(
        RagConfig::builder().top_k(0).build(),
        Err(RagError::InvalidConfiguration(_))
    ));
}

#[test]
fn zero_snippet_length_is_rejected() {
    assert!(matches!(
        RagConfig::builder().snippet_max_chars(0).build(),
        Err(RagError::InvalidConfiguration(_))
    ));
}

#[test]
fn builder_overrides_apply() {
    let config = RagConfig::builder()
        .chunk_max_chars(512)
        .chunk_overlap_chars(64)
        .boundary_lookback_chars(50)
        .embed_batch_size(500)
        .upsert_batch_size(50)
        .top_k(10)
        .snippet_max_chars(300)
        .build()
        .unwrap();

    assert_eq!(config.chunk_max_chars, 512);
    assert_eq!(config.chunk_overlap_chars, 64);
    assert_eq!(config.boundary_lookback_chars, 50);
    assert_eq!(config.embed_batch_size, 500);
    assert_eq!(config.upsert_batch_size, 50);
    assert_eq!(config.top_k, 10);
    assert_eq!(config.snippet_max_chars, 300);
}
