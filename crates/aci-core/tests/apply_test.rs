// Integration tests for the apply engine against a mocked APIC.
//
// Each test wires up the DN lookups a real controller would answer and
// asserts on the read-diff-gate-commit behavior: what gets committed,
// what doesn't, and which fail-fast validation fires first.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aci_core::{
    BridgeDomainConfig, ContextConfig, ContractConfig, ContractScope, ControllerConfig, CoreError,
    DesiredState, Fabric, QosClass, SubjectConfig, TenantConfig, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn fabric(server: &MockServer) -> Fabric {
    let config = ControllerConfig {
        url: server.uri().parse().unwrap(),
        username: "admin".into(),
        password: SecretString::from("s3cret"),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
    };
    Fabric::new(config).unwrap()
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/xml")
}

fn empty_imdata() -> ResponseTemplate {
    xml(r#"<imdata totalCount="0"></imdata>"#)
}

/// Mount a plain DN lookup (no query string) returning the given body.
async fn mount_dn(server: &MockServer, dn: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/mo/{dn}.xml")))
        .respond_with(xml(body))
        .mount(server)
        .await;
}

async fn mount_dn_absent(server: &MockServer, dn: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/mo/{dn}.xml")))
        .respond_with(empty_imdata())
        .mount(server)
        .await;
}

fn commit_ok() -> ResponseTemplate {
    xml(r#"<imdata totalCount="0"></imdata>"#)
}

// ── Context ─────────────────────────────────────────────────────────

// Scenario: context absent, state=present -- a create with existing={}
// and changed=true.
#[tokio::test]
async fn context_net_new_creates() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;

    // First lookup: absent. After the commit, the re-read finds it.
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1/ctx-c1.xml"))
        .respond_with(empty_imdata())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .and(body_string_contains(r#"dn="uni/tn-t1/ctx-c1""#))
        .and(body_string_contains(r#"name="c1""#))
        .respond_with(commit_ok())
        .expect(1)
        .mount(&server)
        .await;
    mount_dn(
        &server,
        "uni/tn-t1/ctx-c1",
        r#"<imdata totalCount="1"><fvCtx dn="uni/tn-t1/ctx-c1" name="c1"/></imdata>"#,
    )
    .await;

    let config = ContextConfig {
        tenant: "t1".into(),
        name: "c1".into(),
        descr: None,
    };
    let report = fabric(&server).apply_context(&config, false).await.unwrap();

    assert!(report.changed);
    assert!(report.existing.is_empty());
    assert!(report.xmldoc.contains("fvCtx"));
    assert!(report.new.is_some());
    assert_eq!(report.state, DesiredState::Present);
}

// Scenario: context exists with descr="old", same descr proposed --
// empty delta, changed=false, no commit.
#[tokio::test]
async fn context_unchanged_descr_is_noop() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/ctx-c1",
        r#"<imdata totalCount="1"><fvCtx dn="uni/tn-t1/ctx-c1" name="c1" descr="old"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = ContextConfig {
        tenant: "t1".into(),
        name: "c1".into(),
        descr: Some("old".into()),
    };
    let report = fabric(&server).apply_context(&config, false).await.unwrap();

    assert!(!report.changed);
    assert!(report.xmldoc.is_empty());
    assert!(report.new.is_none());
}

#[tokio::test]
async fn context_missing_tenant_fails_fast() {
    let server = MockServer::start().await;

    mount_dn_absent(&server, "uni/tn-nope").await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = ContextConfig {
        tenant: "nope".into(),
        name: "c1".into(),
        descr: None,
    };
    let err = fabric(&server).apply_context(&config, false).await.unwrap_err();
    match err {
        CoreError::MissingPrerequisite { kind, name } => {
            assert_eq!(kind, "tenant");
            assert_eq!(name, "nope");
        }
        other => panic!("expected MissingPrerequisite, got {other:?}"),
    }
}

// Check mode never commits but reports the same trigger as live mode.
#[tokio::test]
async fn context_check_mode_reports_without_commit() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn_absent(&server, "uni/tn-t1/ctx-c1").await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = ContextConfig {
        tenant: "t1".into(),
        name: "c1".into(),
        descr: Some("Lab VRF".into()),
    };
    let report = fabric(&server).apply_context(&config, true).await.unwrap();

    assert!(report.changed);
    assert!(report.xmldoc.contains(r#"descr="Lab VRF""#));
    assert!(report.new.is_none());
}

// ── Tenant ──────────────────────────────────────────────────────────

#[tokio::test]
async fn tenant_net_new_commits_even_with_no_attrs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1.xml"))
        .respond_with(empty_imdata())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .and(body_string_contains(r#"<fvTenant dn="uni/tn-t1" name="t1"/>"#))
        .respond_with(commit_ok())
        .expect(1)
        .mount(&server)
        .await;
    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;

    let config = TenantConfig {
        name: "t1".into(),
        descr: None,
    };
    let report = fabric(&server).apply_tenant(&config, false).await.unwrap();

    // The literal delta of supplied attributes is empty, but net-new
    // still triggers a mutation.
    assert!(report.changed);
    assert!(report.proposed.is_empty());
}

// ── Bridge domain ───────────────────────────────────────────────────

// Scenario: BD exists with a subnet the caller didn't mention. The
// unchanged subnet is resent in the committed object; changed only
// because the description differs.
#[tokio::test]
async fn bridge_domain_resends_existing_subnet() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1/BD-bd1.xml"))
        .and(query_param("rsp-subtree", "children"))
        .respond_with(xml(
            r#"<imdata totalCount="1">
                <fvBD dn="uni/tn-t1/BD-bd1" name="bd1" descr="old">
                    <fvRsCtx tnFvCtxName="ctx1"/>
                    <fvSubnet ip="10.1.100.1/24"/>
                </fvBD>
            </imdata>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .and(body_string_contains(r#"descr="servers""#))
        .and(body_string_contains(r#"<fvSubnet ip="10.1.100.1/24"/>"#))
        .and(body_string_contains(r#"<fvRsCtx tnFvCtxName="ctx1"/>"#))
        .respond_with(commit_ok())
        .expect(1)
        .mount(&server)
        .await;

    let config = BridgeDomainConfig {
        tenant: "t1".into(),
        name: "bd1".into(),
        context: None,
        subnet: None,
        descr: Some("servers".into()),
    };
    let report = fabric(&server)
        .apply_bridge_domain(&config, false)
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.existing.get("subnet"), Some("10.1.100.1/24"));
    assert!(report.xmldoc.contains(r#"ip="10.1.100.1/24""#));
}

#[tokio::test]
async fn bridge_domain_unchanged_is_noop() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1/BD-bd1.xml"))
        .and(query_param("rsp-subtree", "children"))
        .respond_with(xml(
            r#"<imdata totalCount="1">
                <fvBD dn="uni/tn-t1/BD-bd1" name="bd1" descr="servers">
                    <fvSubnet ip="10.1.100.1/24"/>
                </fvBD>
            </imdata>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = BridgeDomainConfig {
        tenant: "t1".into(),
        name: "bd1".into(),
        context: None,
        subnet: Some("10.1.100.1/24".into()),
        descr: Some("servers".into()),
    };
    let report = fabric(&server)
        .apply_bridge_domain(&config, false)
        .await
        .unwrap();

    assert!(!report.changed);
    assert!(report.xmldoc.is_empty());
}

// ── Contract ────────────────────────────────────────────────────────

#[tokio::test]
async fn contract_idempotent_reapply() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web",
        r#"<imdata totalCount="1">
            <vzBrCP dn="uni/tn-t1/brc-web" name="web" scope="context" prio="level1"/>
        </imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let config = ContractConfig {
        tenant: "t1".into(),
        name: "web".into(),
        scope: Some(ContractScope::Context),
        prio: Some(QosClass::Level1),
        descr: None,
    };
    let report = fabric(&server).apply_contract(&config, false).await.unwrap();
    assert!(!report.changed);
}

// ── Contract subject ────────────────────────────────────────────────

fn subject_config() -> SubjectConfig {
    SubjectConfig {
        tenant: "t1".into(),
        contract: "web".into(),
        name: "s1".into(),
        descr: None,
        prio: None,
        reverse_filter_ports: None,
        apply_both_directions: true,
        filters: Vec::new(),
        in_filters: Vec::new(),
        out_filters: Vec::new(),
        svc_graph: None,
    }
}

// Scenario: apply_both_directions with in_filters supplied -- fails
// before any lookup-based delta work (no HTTP requests at all).
#[tokio::test]
async fn subject_invalid_combination_fails_before_lookups() {
    let server = MockServer::start().await;

    let mut config = subject_config();
    config.in_filters = vec!["web".into()];

    let err = fabric(&server).apply_subject(&config, false).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidParameterCombination { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// Scenario: proposed filter not found in target tenant or 'common' --
// fails naming the filter, before any commit.
#[tokio::test]
async fn subject_unknown_filter_fails_named() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web",
        r#"<imdata totalCount="1"><vzBrCP dn="uni/tn-t1/brc-web" name="web"/></imdata>"#,
    )
    .await;
    mount_dn_absent(&server, "uni/tn-t1/brc-web/subj-s1").await;
    mount_dn_absent(&server, "uni/tn-t1/flt-filt-x").await;
    mount_dn_absent(&server, "uni/tn-common/flt-filt-x").await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let mut config = subject_config();
    config.filters = vec!["filt-x".into()];

    let err = fabric(&server).apply_subject(&config, false).await.unwrap_err();
    match err {
        CoreError::UnmetDependency { kind, name } => {
            assert_eq!(kind, "filter");
            assert_eq!(name, "filt-x");
        }
        other => panic!("expected UnmetDependency, got {other:?}"),
    }
}

// A filter that only resolves via the shared 'common' tenant is fine.
#[tokio::test]
async fn subject_filter_resolves_from_common() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web",
        r#"<imdata totalCount="1"><vzBrCP dn="uni/tn-t1/brc-web" name="web"/></imdata>"#,
    )
    .await;
    // Subject is net-new: first lookup empty, re-read finds it.
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1/brc-web/subj-s1.xml"))
        .respond_with(empty_imdata())
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_dn_absent(&server, "uni/tn-t1/flt-icmp").await;
    mount_dn(
        &server,
        "uni/tn-common/flt-icmp",
        r#"<imdata totalCount="1"><vzFilter dn="uni/tn-common/flt-icmp" name="icmp"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .and(body_string_contains(r#"<vzRsSubjFiltAtt tnVzFilterName="icmp"/>"#))
        .respond_with(commit_ok())
        .expect(1)
        .mount(&server)
        .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web/subj-s1",
        r#"<imdata totalCount="1"><vzSubj dn="uni/tn-t1/brc-web/subj-s1" name="s1"/></imdata>"#,
    )
    .await;

    let mut config = subject_config();
    config.filters = vec!["icmp".into()];

    let report = fabric(&server).apply_subject(&config, false).await.unwrap();
    assert!(report.changed);
}

// Scenario: switching direction mode on an existing subject fails with
// a remove-first condition.
#[tokio::test]
async fn subject_direction_switch_is_rejected() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web",
        r#"<imdata totalCount="1"><vzBrCP dn="uni/tn-t1/brc-web" name="web"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web/subj-s1",
        r#"<imdata totalCount="1"><vzSubj dn="uni/tn-t1/brc-web/subj-s1" name="s1"/></imdata>"#,
    )
    .await;
    // Existing subject carries in/out terms: split mode.
    mount_dn(
        &server,
        "uni/tn-t1/brc-web/subj-s1/intmnl",
        r#"<imdata totalCount="1"><vzInTerm dn="uni/tn-t1/brc-web/subj-s1/intmnl"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    // Proposed mode: bidirectional.
    let config = subject_config();
    let err = fabric(&server).apply_subject(&config, false).await.unwrap_err();
    match err {
        CoreError::ImmutableTransition { message } => {
            assert!(message.contains("remove the subject first"), "{message}");
        }
        other => panic!("expected ImmutableTransition, got {other:?}"),
    }
}

// Proposing only already-attached filters results in no new attachment
// and no commit.
#[tokio::test]
async fn subject_already_attached_filters_are_noop() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web",
        r#"<imdata totalCount="1"><vzBrCP dn="uni/tn-t1/brc-web" name="web"/></imdata>"#,
    )
    .await;
    // The children query shares the subject's path; mount it first with
    // its query-param matcher so the plain lookup doesn't swallow it.
    Mock::given(method("GET"))
        .and(path("/api/mo/uni/tn-t1/brc-web/subj-s1.xml"))
        .and(query_param("query-target", "children"))
        .and(query_param("target-subtree-class", "vzRsSubjFiltAtt"))
        .respond_with(xml(
            r#"<imdata totalCount="1"><vzRsSubjFiltAtt tnVzFilterName="icmp"/></imdata>"#,
        ))
        .mount(&server)
        .await;
    mount_dn(
        &server,
        "uni/tn-t1/brc-web/subj-s1",
        r#"<imdata totalCount="1"><vzSubj dn="uni/tn-t1/brc-web/subj-s1" name="s1"/></imdata>"#,
    )
    .await;
    mount_dn_absent(&server, "uni/tn-t1/brc-web/subj-s1/intmnl").await;
    mount_dn_absent(&server, "uni/tn-t1/brc-web/subj-s1/outtmnl").await;
    mount_dn(
        &server,
        "uni/tn-t1/flt-icmp",
        r#"<imdata totalCount="1"><vzFilter dn="uni/tn-t1/flt-icmp" name="icmp"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let mut config = subject_config();
    config.filters = vec!["icmp".into()];

    let report = fabric(&server).apply_subject(&config, false).await.unwrap();
    assert!(!report.changed);
    assert!(report.xmldoc.is_empty());
}

// ── Removal ─────────────────────────────────────────────────────────

// Scenario: state=absent, object does not exist -- changed=false, empty
// change document, no commit call.
#[tokio::test]
async fn remove_absent_object_is_noop() {
    let server = MockServer::start().await;

    mount_dn_absent(&server, "uni/tn-t1/ctx-gone").await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let report = fabric(&server)
        .remove_context("t1", "gone", false)
        .await
        .unwrap();

    assert!(!report.changed);
    assert!(report.xmldoc.is_empty());
    assert_eq!(report.state, DesiredState::Absent);
}

#[tokio::test]
async fn remove_existing_object_commits_deleted_status() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1" descr="lab"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/mo/uni.xml"))
        .and(body_string_contains(r#"status="deleted""#))
        .and(body_string_contains(r#"dn="uni/tn-t1""#))
        .respond_with(commit_ok())
        .expect(1)
        .mount(&server)
        .await;

    let report = fabric(&server).remove_tenant("t1", false).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.existing.get("descr"), Some("lab"));
    assert!(report.xmldoc.contains(r#"status="deleted""#));
}

#[tokio::test]
async fn remove_check_mode_never_commits() {
    let server = MockServer::start().await;

    mount_dn(
        &server,
        "uni/tn-t1",
        r#"<imdata totalCount="1"><fvTenant dn="uni/tn-t1" name="t1"/></imdata>"#,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(commit_ok())
        .expect(0)
        .mount(&server)
        .await;

    let report = fabric(&server).remove_tenant("t1", true).await.unwrap();
    assert!(report.changed);
    assert!(report.xmldoc.contains(r#"status="deleted""#));
}
