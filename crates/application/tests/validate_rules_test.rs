use ferrous_rules_application::use_cases::{ValidateRulesUseCase, ValidationPolicy};
use ferrous_rules_domain::{ParsedRule, ResolutionOutcome, RuleOrigin};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::{MockDomainResolver, MockResolutionCacheStore};

fn rules(lines: &[&str]) -> Vec<ParsedRule> {
    lines
        .iter()
        .filter_map(|l| ParsedRule::parse(l, RuleOrigin::Upstream))
        .collect()
}

fn texts(rules: &[ParsedRule]) -> Vec<&str> {
    rules.iter().map(|r| r.original_text.as_ref()).collect()
}

fn servers() -> Vec<SocketAddr> {
    vec!["127.0.0.1:53".parse().unwrap()]
}

fn policy() -> ValidationPolicy {
    ValidationPolicy {
        concurrency: 4,
        domain_deadline: Duration::from_secs(5),
        batch_timeout: Duration::from_secs(30),
        force_refresh: false,
        progress_interval: 100,
    }
}

fn use_case(
    resolver: &MockDomainResolver,
    store: &MockResolutionCacheStore,
    policy: ValidationPolicy,
) -> ValidateRulesUseCase {
    ValidateRulesUseCase::new(
        Arc::new(resolver.clone()),
        Arc::new(store.clone()),
        servers(),
        policy,
    )
}

// ============================================================================
// Outcome policy
// ============================================================================

#[tokio::test]
async fn test_not_found_block_rule_is_removed() {
    // Arrange
    let resolver = MockDomainResolver::new();
    resolver.set_outcome("gone.example.com", ResolutionOutcome::NotFound);
    let store = MockResolutionCacheStore::new();
    let use_case = use_case(&resolver, &store, policy());

    // Act
    let report = use_case
        .execute(rules(&["||gone.example.com^", "||live.example.com^"]))
        .await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["||live.example.com^"]);
    assert_eq!(texts(&report.removed), vec!["||gone.example.com^"]);
    assert_eq!(report.stats.not_found, 1);
    assert_eq!(report.stats.resolvable, 1);
    assert_eq!(report.stats.removed, 1);

    let cache = store.entries().await;
    assert_eq!(cache.get("gone.example.com"), Some(&false));
    assert_eq!(cache.get("live.example.com"), Some(&true));
}

#[tokio::test]
async fn test_indeterminate_is_fail_open_and_cached_as_kept() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::Indeterminate);
    let store = MockResolutionCacheStore::new();
    let use_case = use_case(&resolver, &store, policy());

    // Act
    let report = use_case.execute(rules(&["||flaky.example.com^"])).await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["||flaky.example.com^"]);
    assert!(report.removed.is_empty());
    assert_eq!(report.stats.indeterminate, 1);
    assert_eq!(
        store.entries().await.get("flaky.example.com"),
        Some(&true)
    );
}

#[tokio::test]
async fn test_allow_rules_are_never_resolved_or_removed() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    let store = MockResolutionCacheStore::new();
    let use_case = use_case(&resolver, &store, policy());

    // Act
    let report = use_case
        .execute(rules(&["@@||intranet.example.com^", "||gone.example.com^"]))
        .await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["@@||intranet.example.com^"]);
    assert_eq!(report.stats.allow_exempt, 1);
    assert_eq!(resolver.calls(), vec!["gone.example.com"]);
}

// ============================================================================
// Cache behaviour
// ============================================================================

#[tokio::test]
async fn test_cache_hits_short_circuit_resolution() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    let store = MockResolutionCacheStore::with_entries(vec![
        ("cached-live.example.com", true),
        ("cached-dead.example.com", false),
    ])
    .await;
    let use_case = use_case(&resolver, &store, policy());

    // Act
    let report = use_case
        .execute(rules(&[
            "||cached-dead.example.com^",
            "||cached-live.example.com^",
        ]))
        .await;

    // Assert
    assert_eq!(resolver.call_count(), 0);
    assert_eq!(texts(&report.kept), vec!["||cached-live.example.com^"]);
    assert_eq!(texts(&report.removed), vec!["||cached-dead.example.com^"]);
    assert_eq!(report.stats.cache_hits, 2);
    assert_eq!(store.save_count().await, 0, "unchanged cache is not rewritten");
}

#[tokio::test]
async fn test_cached_result_matches_fresh_resolution() {
    let resolver = MockDomainResolver::new();
    resolver.set_outcome("gone.example.com", ResolutionOutcome::NotFound);
    let input = &["||gone.example.com^", "||live.example.com^"];

    let store = MockResolutionCacheStore::new();
    let fresh = use_case(&resolver, &store, policy()).execute(rules(input)).await;
    assert_eq!(resolver.call_count(), 2);

    let cached = use_case(&resolver, &store, policy()).execute(rules(input)).await;
    assert_eq!(resolver.call_count(), 2, "second run must be served from cache");

    assert_eq!(texts(&fresh.kept), texts(&cached.kept));
    assert_eq!(texts(&fresh.removed), texts(&cached.removed));
}

#[tokio::test]
async fn test_force_refresh_ignores_cache() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    let store = MockResolutionCacheStore::with_entries(vec![("ads.example.com", true)]).await;
    let policy = ValidationPolicy {
        force_refresh: true,
        ..policy()
    };
    let use_case = use_case(&resolver, &store, policy);

    // Act
    let report = use_case.execute(rules(&["||ads.example.com^"])).await;

    // Assert
    assert_eq!(resolver.call_count(), 1);
    assert!(report.kept.is_empty());
    assert_eq!(store.entries().await.get("ads.example.com"), Some(&false));
}

#[tokio::test]
async fn test_unreadable_cache_is_treated_as_empty() {
    // Arrange
    let resolver = MockDomainResolver::new();
    let store = MockResolutionCacheStore::new();
    store.set_fail_load(true).await;
    let use_case = use_case(&resolver, &store, policy());

    // Act
    let report = use_case.execute(rules(&["||ads.example.com^"])).await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["||ads.example.com^"]);
    assert_eq!(resolver.call_count(), 1);
    assert_eq!(store.save_count().await, 1);
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn test_duplicate_domains_are_resolved_once() {
    let resolver = MockDomainResolver::new();
    let store = MockResolutionCacheStore::new();
    let use_case = use_case(&resolver, &store, policy());

    let report = use_case
        .execute(rules(&["||ads.example.com^", "||ads.example.com^$important"]))
        .await;

    assert_eq!(resolver.call_count(), 1);
    assert_eq!(report.kept.len(), 2);
    assert_eq!(report.stats.unique_domains, 1);
}

#[tokio::test]
async fn test_many_domains_with_small_pool() {
    let resolver = MockDomainResolver::new();
    let store = MockResolutionCacheStore::new();
    let policy = ValidationPolicy {
        concurrency: 3,
        ..policy()
    };
    let use_case = use_case(&resolver, &store, policy);

    let lines: Vec<String> = (0..50).map(|i| format!("||host{}x.example.com^", i)).collect();
    let input: Vec<&str> = lines.iter().map(String::as_str).collect();

    let report = use_case.execute(rules(&input)).await;

    assert_eq!(report.kept.len(), 50);
    assert_eq!(resolver.call_count(), 50);
    assert_eq!(store.entries().await.len(), 50);
}

#[tokio::test(start_paused = true)]
async fn test_per_domain_deadline_counts_as_indeterminate() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    resolver.set_delay("slow.example.com", Duration::from_secs(60));
    let store = MockResolutionCacheStore::new();
    let policy = ValidationPolicy {
        domain_deadline: Duration::from_secs(2),
        ..policy()
    };
    let use_case = use_case(&resolver, &store, policy);

    // Act
    let report = use_case.execute(rules(&["||slow.example.com^"])).await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["||slow.example.com^"]);
    assert_eq!(report.stats.indeterminate, 1);
}

#[tokio::test(start_paused = true)]
async fn test_batch_timeout_keeps_stuck_rules_uncached() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    resolver.set_delay("stuck.example.com", Duration::from_secs(3600));
    let store = MockResolutionCacheStore::new();
    let policy = ValidationPolicy {
        concurrency: 2,
        domain_deadline: Duration::from_secs(7200),
        batch_timeout: Duration::from_secs(10),
        ..policy()
    };
    let use_case = use_case(&resolver, &store, policy);

    // Act
    let report = use_case
        .execute(rules(&["||gone.example.com^", "||stuck.example.com^"]))
        .await;

    // Assert
    assert_eq!(texts(&report.kept), vec!["||stuck.example.com^"]);
    assert_eq!(texts(&report.removed), vec!["||gone.example.com^"]);
    assert_eq!(report.stats.timed_out, 1);

    let cache = store.entries().await;
    assert_eq!(cache.get("gone.example.com"), Some(&false));
    assert!(cache.get("stuck.example.com").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_batch_timeout_caches_exactly_the_collected_outcomes() {
    // Arrange
    let resolver = MockDomainResolver::with_default(ResolutionOutcome::NotFound);
    for i in 0..4 {
        resolver.set_delay(&format!("stuck{}x.example.com", i), Duration::from_secs(3600));
    }
    let store = MockResolutionCacheStore::new();
    let policy = ValidationPolicy {
        concurrency: 3,
        domain_deadline: Duration::from_secs(7200),
        batch_timeout: Duration::from_secs(10),
        ..policy()
    };
    let use_case = use_case(&resolver, &store, policy);

    let mut lines: Vec<String> = (0..4).map(|i| format!("||stuck{}x.example.com^", i)).collect();
    lines.extend((0..6).map(|i| format!("||gone{}x.example.com^", i)));
    let input: Vec<&str> = lines.iter().map(String::as_str).collect();

    // Act
    let report = use_case.execute(rules(&input)).await;

    // Assert
    let cache = store.entries().await;
    assert_eq!(report.stats.timed_out + report.stats.resolved, 10);
    assert!(report.stats.timed_out >= 4);
    assert_eq!(cache.len(), report.stats.resolved);
    for rule in &report.kept {
        assert!(
            cache.get(rule.domain.as_ref()).is_none(),
            "timed-out {} must not be cached",
            rule.domain
        );
    }
    for rule in &report.removed {
        assert_eq!(cache.get(rule.domain.as_ref()), Some(&false));
    }
}

#[tokio::test]
async fn test_validation_output_is_deterministic() {
    let resolver = MockDomainResolver::new();
    resolver.set_outcome("b.example.com", ResolutionOutcome::NotFound);
    let store = MockResolutionCacheStore::new();
    let input = &[
        "@@||z.example.com^",
        "||a.example.com^",
        "||b.example.com^",
        "||c.example.com^",
    ];

    let first = use_case(&resolver, &store, policy()).execute(rules(input)).await;
    let second = use_case(&resolver, &store, policy()).execute(rules(input)).await;

    assert_eq!(texts(&first.kept), texts(&second.kept));
    assert_eq!(
        texts(&first.kept),
        vec!["@@||z.example.com^", "||a.example.com^", "||c.example.com^"]
    );
}

#[tokio::test]
async fn test_empty_rule_set() {
    let resolver = MockDomainResolver::new();
    let store = MockResolutionCacheStore::new();
    let report = use_case(&resolver, &store, policy()).execute(vec![]).await;

    assert!(report.kept.is_empty());
    assert_eq!(report.stats, Default::default());
    assert_eq!(resolver.call_count(), 0);
}
