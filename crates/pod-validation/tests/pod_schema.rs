//! Integration tests for the Pod schema rules.
//!
//! Documents are parsed with pod-yaml so every diagnostic line is checked
//! against real source positions.

use pod_validation::{
    Diagnostic, DiagnosticCategory, IntegerPolicy, ReportPolicy, SchemaConfig, ValidationOptions,
    validate, validate_source,
};

const VALID_POD: &str = r#"apiVersion: v1
kind: Pod
metadata:
  name: web-app
  namespace: default
  labels:
    app: web
spec:
  os:
    name: linux
  containers:
    - name: web
      image: registry.bigbrother.io/web:1.0
      ports:
        - containerPort: 8080
          protocol: TCP
      readinessProbe:
        httpGet:
          path: /healthz
          port: 8080
      livenessProbe:
        httpGet:
          path: /live
          port: 8080
      resources:
        limits:
          cpu: 2
          memory: "512Mi"
        requests:
          cpu: 1
          memory: 256Mi
"#;

fn check(content: &str) -> Vec<Diagnostic> {
    check_with(content, ValidationOptions::default())
}

fn check_with(content: &str, options: ValidationOptions) -> Vec<Diagnostic> {
    validate_source(content, &SchemaConfig::default(), options)
}

/// Replace exactly one occurrence, so line numbers stay put.
fn edit(from: &str, to: &str) -> String {
    assert_eq!(VALID_POD.matches(from).count(), 1, "ambiguous edit of {:?}", from);
    VALID_POD.replace(from, to)
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("{} {}", d.line, d.message()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_valid_pod_has_no_diagnostics() {
    assert_eq!(check(VALID_POD), vec![]);
}

#[test]
fn test_missing_top_level_field() {
    for (line, field) in [
        ("apiVersion: v1\n", "apiVersion"),
        ("kind: Pod\n", "kind"),
    ] {
        let diagnostics = check(&edit(line, ""));
        assert_eq!(diagnostics.len(), 1, "{}", render(&diagnostics));
        assert_eq!(diagnostics[0].message(), format!("{} is required", field));
        assert_eq!(diagnostics[0].line, 0);
        assert_eq!(diagnostics[0].category(), DiagnosticCategory::MissingField);
    }
}

#[test]
fn test_missing_fields_are_each_reported() {
    let diagnostics = check("metadata:\n  name: web\n");
    assert_eq!(
        render(&diagnostics),
        "0 apiVersion is required\n0 kind is required\n0 spec is required"
    );
}

#[test]
fn test_api_version_value() {
    let diagnostics = check(&edit("apiVersion: v1", "apiVersion: v2"));
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message(), "apiVersion has unsupported value 'v2'");
    assert_eq!(diagnostics[0].line, 1);

    let diagnostics = check(&edit("kind: Pod", "kind: Deployment"));
    assert_eq!(render(&diagnostics), "2 kind has unsupported value 'Deployment'");
}

#[test]
fn test_duplicate_container_names() {
    let content = r#"apiVersion: v1
kind: Pod
metadata:
  name: pod
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/web:1.0
      resources: {}
    - name: sidecar
      image: registry.bigbrother.io/sidecar:1.0
      resources: {}
    - name: web
      image: registry.bigbrother.io/web:2.0
      resources: {}
"#;
    let diagnostics = check(content);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 13);
    assert_eq!(diagnostics[0].category(), DiagnosticCategory::Uniqueness);
    assert_eq!(
        diagnostics[0].message(),
        "spec.containers[2].name has duplicate value 'web' (first defined at line 7)"
    );
}

#[test]
fn test_container_port_range() {
    for bad in ["0", "70000", "-1"] {
        let diagnostics = check(&edit(
            "containerPort: 8080",
            &format!("containerPort: {}", bad),
        ));
        assert_eq!(
            render(&diagnostics),
            "15 spec.containers[0].ports[0].containerPort value out of range"
        );
    }

    for good in ["1", "65535", "80"] {
        let content = edit("containerPort: 8080", &format!("containerPort: {}", good));
        assert!(check(&content).is_empty());
    }
}

#[test]
fn test_container_port_must_be_int() {
    let diagnostics = check(&edit("containerPort: 8080", "containerPort: \"8080\""));
    assert_eq!(
        render(&diagnostics),
        "15 spec.containers[0].ports[0].containerPort must be int"
    );
}

#[test]
fn test_protocol_value() {
    let diagnostics = check(&edit("protocol: TCP", "protocol: SCTP"));
    assert_eq!(
        render(&diagnostics),
        "16 spec.containers[0].ports[0].protocol has unsupported value 'SCTP'"
    );
    assert!(check(&edit("protocol: TCP", "protocol: UDP")).is_empty());
}

#[test]
fn test_memory_format() {
    assert!(check(&edit("memory: \"512Mi\"", "memory: \"1Gi\"")).is_empty());
    assert!(check(&edit("memory: \"512Mi\"", "memory: 64Ki")).is_empty());

    for bad in ["\"512\"", "\"512Xi\"", "\"Mi\"", "\"512 Mi\""] {
        let diagnostics = check(&edit("memory: \"512Mi\"", &format!("memory: {}", bad)));
        assert_eq!(diagnostics.len(), 1, "{}", bad);
        assert_eq!(diagnostics[0].line, 28);
        assert!(
            diagnostics[0]
                .message()
                .starts_with("spec.containers[0].resources.limits.memory has invalid format")
        );
    }
}

#[test]
fn test_image_format() {
    let cases = [
        ("registry.bigbrother.io/app", false),
        ("registry.bigbrother.io/app:1.0", true),
        ("registry.bigbrother.io/team/app:latest", true),
        ("docker.io/app:1.0", false),
        ("registry.bigbrother.io/:1.0", false),
        ("registry.bigbrother.io/app:", false),
    ];
    for (image, valid) in cases {
        let content = edit(
            "image: registry.bigbrother.io/web:1.0",
            &format!("image: \"{}\"", image),
        );
        let diagnostics = check(&content);
        if valid {
            assert!(diagnostics.is_empty(), "{}: {}", image, render(&diagnostics));
        } else {
            assert_eq!(
                render(&diagnostics),
                format!("13 spec.containers[0].image has invalid format '{}'", image)
            );
        }
    }
}

#[test]
fn test_container_name_format() {
    for (name, valid) in [
        ("web", true),
        ("web_2", true),
        ("a1", true),
        ("Web", false),
        ("2web", false),
        ("web-app", false),
        ("_web", false),
    ] {
        let content = edit("- name: web", &format!("- name: {}", name));
        let diagnostics = check(&content);
        assert_eq!(diagnostics.is_empty(), valid, "{}: {}", name, render(&diagnostics));
    }
}

#[test]
fn test_numeric_token_in_free_form_name() {
    // A bare number is still text for metadata.name ...
    assert!(check(&edit("name: web-app", "name: 2048")).is_empty());
    // ... but not for a field with a fixed vocabulary.
    let diagnostics = check(&edit("protocol: TCP", "protocol: 6"));
    assert_eq!(
        render(&diagnostics),
        "16 spec.containers[0].ports[0].protocol must be string"
    );
}

#[test]
fn test_metadata_rules() {
    let diagnostics = check(&edit("name: web-app", "name: \"\""));
    assert_eq!(render(&diagnostics), "4 metadata.name must be non-empty");

    let diagnostics = check(&edit("app: web", "app: 1"));
    assert_eq!(render(&diagnostics), "7 metadata.labels.app must be string");

    let diagnostics = check(&edit("    app: web\n", "").replace("labels:", "labels: web"));
    assert_eq!(render(&diagnostics), "6 metadata.labels must be object");
}

#[test]
fn test_label_with_complex_key() {
    let diagnostics = check(&edit("    app: web\n", "    ? [a, b]\n    : 1\n"));
    assert_eq!(render(&diagnostics), "8 metadata.labels[0] must be string");
}

#[test]
fn test_empty_values_are_reported_on_their_key_line() {
    let content = "apiVersion: v1\nkind: Pod\nmetadata:\nspec:\n  containers:\n    - name:\n      image: registry.bigbrother.io/a:1\n      resources: {}\n";
    assert_eq!(
        render(&check(content)),
        "3 metadata must be object\n6 spec.containers[0].name must be string"
    );

    let content = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n\n\n";
    assert_eq!(render(&check(content)), "5 spec must be object");

    let content = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n  containers:\n    -\n    # none yet\n\n";
    assert_eq!(render(&check(content)), "7 spec.containers[0] must be object");
}

#[test]
fn test_os_name() {
    let diagnostics = check(&edit("name: linux", "name: macos"));
    assert_eq!(render(&diagnostics), "10 spec.os.name has unsupported value 'macos'");
    assert!(check(&edit("name: linux", "name: windows")).is_empty());

    let diagnostics = check(&edit("  os:\n    name: linux\n", "  os: linux\n"));
    assert_eq!(render(&diagnostics), "9 spec.os must be object");
}

#[test]
fn test_probe_rules() {
    let diagnostics = check(&edit("path: /healthz", "path: healthz"));
    assert_eq!(
        render(&diagnostics),
        "19 spec.containers[0].readinessProbe.httpGet.path has invalid format 'healthz'"
    );

    let content = VALID_POD.replace("          path: /live\n          port: 8080\n", "          path: /live\n");
    let diagnostics = check(&content);
    assert_eq!(
        render(&diagnostics),
        "0 spec.containers[0].livenessProbe.httpGet.port is required"
    );

    let diagnostics = check(&edit("          port: 8080\n      livenessProbe", "          port: 0\n      livenessProbe"));
    assert_eq!(
        render(&diagnostics),
        "20 spec.containers[0].readinessProbe.httpGet.port value out of range"
    );
}

#[test]
fn test_structural_mismatch_skips_subtree() {
    let content = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec: nothing\n";
    assert_eq!(render(&check(content)), "5 spec must be object");

    let content = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n  containers: web\n";
    assert_eq!(render(&check(content)), "6 spec.containers must be array");

    let content = "apiVersion: v1\nkind: Pod\nmetadata:\n  name: p\nspec:\n  containers: []\n";
    assert_eq!(render(&check(content)), "6 spec.containers must be non-empty");

    assert_eq!(render(&check("- a\n- b\n")), "1 root must be object");
}

#[test]
fn test_resources_required_and_shaped() {
    let content = r#"apiVersion: v1
kind: Pod
metadata:
  name: pod
spec:
  containers:
    - name: web
      image: registry.bigbrother.io/web:1.0
    - name: db
      image: registry.bigbrother.io/db:1.0
      resources:
        limits: 4
        requests:
          gpu: 1
"#;
    assert_eq!(
        render(&check(content)),
        "0 spec.containers[0].resources is required\n\
         12 spec.containers[1].resources.limits must be object"
    );
}

const BROKEN_POD: &str = r#"apiVersion: v2
kind: Pod
metadata:
  name: ""
spec:
  os:
    name: macos
  containers:
    - name: Web
      image: docker.io/web:1.0
      ports:
        - containerPort: 0
          protocol: SCTP
      resources:
        limits:
          cpu: "4"
          memory: 512
"#;

#[test]
fn test_collect_all_reports_everything_in_order() {
    let diagnostics = check(BROKEN_POD);
    insta::assert_snapshot!(render(&diagnostics), @r"
    1 apiVersion has unsupported value 'v2'
    4 metadata.name must be non-empty
    9 spec.containers[0].name has invalid format 'Web'
    10 spec.containers[0].image has invalid format 'docker.io/web:1.0'
    16 spec.containers[0].resources.limits.cpu must be int
    17 spec.containers[0].resources.limits.memory must be string
    12 spec.containers[0].ports[0].containerPort value out of range
    13 spec.containers[0].ports[0].protocol has unsupported value 'SCTP'
    7 spec.os.name has unsupported value 'macos'
    ");
}

#[test]
fn test_fail_fast_stops_at_first_diagnostic() {
    let all = check(BROKEN_POD);
    let first = check_with(BROKEN_POD, ValidationOptions::fail_fast());
    assert_eq!(first.len(), 1);
    assert_eq!(first[0], all[0]);
}

#[test]
fn test_integer_policy_switch() {
    let strict = check(BROKEN_POD);
    let coerce = check_with(
        BROKEN_POD,
        ValidationOptions {
            policy: ReportPolicy::CollectAll,
            integer_policy: IntegerPolicy::Coerce,
        },
    );
    assert_eq!(coerce.len(), strict.len() - 1);
    assert!(!coerce.iter().any(|d| d.message().contains("cpu")));

    // Coercion never turns a non-number into an int.
    let content = edit("cpu: 2", "cpu: \"two\"");
    let diagnostics = check_with(
        &content,
        ValidationOptions {
            integer_policy: IntegerPolicy::Coerce,
            ..Default::default()
        },
    );
    assert_eq!(
        render(&diagnostics),
        "27 spec.containers[0].resources.limits.cpu must be int"
    );
}

#[test]
fn test_validation_is_idempotent() {
    let root = pod_yaml::parse(BROKEN_POD).unwrap();
    let config = SchemaConfig::default();
    let first = validate(&root, &config, ValidationOptions::default());
    let second = validate(&root, &config, ValidationOptions::default());
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_multiple_documents_are_validated_in_sequence() {
    let content = format!("{}---\n{}", VALID_POD, BROKEN_POD);
    let diagnostics = check(&content);
    assert_eq!(diagnostics.len(), check(BROKEN_POD).len());
    // Lines are relative to the whole stream.
    assert_eq!(diagnostics[0].line, 32 + 1);

    let fail_fast = check_with(&content, ValidationOptions::fail_fast());
    assert_eq!(fail_fast.len(), 1);
}

#[test]
fn test_unparseable_document() {
    let diagnostics = check("apiVersion: v1\nkind: [Pod\n");
    assert_eq!(render(&diagnostics), "0 cannot parse document");
    assert_eq!(diagnostics[0].category(), DiagnosticCategory::Parse);
}

#[test]
fn test_custom_schema_config() {
    let settings: pod_validation::SchemaSettings = toml::from_str(
        r#"
image-pattern = '^docker\.io/[^:]+:.+$'
port-max = 1024
"#,
    )
    .unwrap();
    let config = settings.into_config().unwrap();

    let content = edit(
        "image: registry.bigbrother.io/web:1.0",
        "image: docker.io/web:1.0",
    );
    let diagnostics = validate_source(&content, &config, ValidationOptions::default());
    let messages: Vec<String> = diagnostics.iter().map(Diagnostic::message).collect();
    assert_eq!(
        messages,
        vec![
            "spec.containers[0].ports[0].containerPort value out of range",
            "spec.containers[0].readinessProbe.httpGet.port value out of range",
            "spec.containers[0].livenessProbe.httpGet.port value out of range",
        ]
    );
}
