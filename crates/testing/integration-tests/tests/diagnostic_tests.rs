//! Diagnostic reporting tests

use anyhow::Result;
use expect_test::expect;
use integration_tests::{TestFixture, render_diagnostics};
use std::io::Write;
use vl_elab_sig::codespan_reporting::diagnostic::Severity as CodespanSeverity;
use vl_elab_sig::{ElabConfig, Outcome};
use vl_pform::{NetType, PortType, Wire};

fn port_fixture() -> TestFixture {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");

    let span = fixture.span();
    module.add_wire(Wire::new(fixture.sym("a"), NetType::Reg, span).with_port(PortType::Input));

    let port = fixture.range(3, 0);
    let span = fixture.span();
    module.add_wire(
        Wire::new(fixture.sym("v"), NetType::Wire, span)
            .with_port(PortType::Output)
            .with_port_range(vec![port])
            .with_net_range(Vec::new()),
    );

    let net = fixture.range(7, 0);
    let span = fixture.span();
    module.add_wire(
        Wire::new(fixture.sym("w"), NetType::Wire, span)
            .with_port(PortType::Input)
            .with_port_range(Vec::new())
            .with_net_range(vec![net]),
    );

    fixture.add_top(module);
    fixture
}

#[test]
fn test_diagnostics_keep_declaration_order() {
    let mut fixture = port_fixture();
    let report = fixture.elaborate();

    expect![[r#"
        Error: port 'a' of module 'top' is declared as input and as a reg type
        Error: vectored port 'v' [3:0] has a scalar net declaration
        Warning: scalar port 'w' has a vectored net declaration [7:0]
    "#]]
    .assert_eq(&render_diagnostics(&report));
    assert_eq!(report.error_count, 2);
    assert_eq!(report.warning_count, 1);
    assert_eq!(report.outcome, Outcome::Failed);
}

#[test]
fn test_codespan_labels_point_at_declarations() {
    let mut fixture = port_fixture();
    let report = fixture.elaborate();

    let diagnostics: Vec<_> = report
        .diagnostics
        .iter()
        .map(|diagnostic| (diagnostic.span(), diagnostic.to_codespan_diagnostic()))
        .collect();
    for (span, diagnostic) in &diagnostics {
        let [label] = diagnostic.labels.as_slice() else {
            panic!("expected exactly one label");
        };
        assert_eq!(label.file_id, span.file.0);
        assert_eq!(label.range, span.range());
        assert!(diagnostic.code.is_some());
    }
    let severities: Vec<CodespanSeverity> = diagnostics
        .iter()
        .map(|(_, diagnostic)| diagnostic.severity)
        .collect();
    assert_eq!(
        severities,
        [CodespanSeverity::Error, CodespanSeverity::Error, CodespanSeverity::Warning]
    );
}

#[test]
fn test_strict_config_from_file() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "strict-port-ranges = true")?;
    let config = ElabConfig::load(file.path())?;

    let mut fixture = port_fixture();
    let report = fixture.elaborate_with(&config);

    expect![[r#"
        Error: port 'a' of module 'top' is declared as input and as a reg type
        Error: vectored port 'v' [3:0] has a scalar net declaration
        Error: scalar port 'w' has a vectored net declaration [7:0]
    "#]]
    .assert_eq(&render_diagnostics(&report));
    assert_eq!(report.warning_count, 0);
    Ok(())
}

#[test]
fn test_unknown_config_key_is_rejected() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "strict-ports = true")?;
    let err = ElabConfig::load(file.path()).expect_err("unknown key");
    assert!(format!("{err:#}").contains("strict-ports"));
    Ok(())
}
