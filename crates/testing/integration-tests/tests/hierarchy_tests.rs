//! Scope walk tests: generate schemes, module instances, named blocks and
//! the module port header

use integration_tests::TestFixture;
use vl_elab_sig::{ElabError, ErrorCategory, Outcome};
use vl_netlist::{ScopeId, ScopeKind};
use vl_pform::{
    BlockKind, DeclRange, FxIndexMap, Gate, Generate, GenerateId, GenerateScheme, Instance,
    NetType, Port, PortRef, PortType, Process, ProcessKind, Stmt, Wire,
};

/// A generate scheme declaring one wire
fn scheme(fixture: &mut TestFixture, id: u32, scheme: GenerateScheme, wire: &str) -> Generate {
    let span = fixture.span();
    let mut generate = Generate::new(GenerateId(id), scheme, fixture.sym(&format!("g{id}")), span);
    generate.add_wire(Wire::new(fixture.sym(wire), NetType::Wire, span));
    generate
}

/// Records a generate scope instantiated under `parent`
fn instantiate(fixture: &mut TestFixture, parent: ScopeId, id: u32, name: &str) -> ScopeId {
    let scope = fixture.child(parent, name, ScopeKind::Generate);
    fixture.design.record_generate(GenerateId(id), scope);
    scope
}

#[test]
fn test_case_generate_visits_only_the_chosen_arm() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");

    let mut case = Generate::new(GenerateId(0), GenerateScheme::Case, fixture.sym("case"), fixture.span());
    let mut first = scheme(&mut fixture, 1, GenerateScheme::CaseItem, "w1");
    // The arm that was not chosen would fail if it were visited
    let msb = fixture.ident("UNDEFINED");
    let lsb = fixture.num(0);
    let span = fixture.span();
    first.add_wire(Wire::new(fixture.sym("bad"), NetType::Wire, span).with_net_range(vec![DeclRange::new(msb, lsb)]));
    case.generates.push(first);
    case.generates.push(scheme(&mut fixture, 2, GenerateScheme::CaseItem, "w2"));
    case.generates.push(scheme(&mut fixture, 3, GenerateScheme::CaseItem, "w3"));
    module.generates.push(case);

    let top = fixture.add_top(module);
    let chosen = instantiate(&mut fixture, top, 2, "g2");

    let report = fixture.elaborate();
    assert_eq!(report.outcome, Outcome::Clean);
    assert!(report.diagnostics.is_empty());

    assert!(fixture.signal(chosen, "w2").is_some());
    assert_eq!(fixture.design.signal_count(), 1);
}

#[test]
fn test_loop_generate_visits_scopes_of_this_container() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");
    module.generates.push(scheme(&mut fixture, 7, GenerateScheme::Loop, "w"));
    let top = fixture.add_top(module);

    let first = instantiate(&mut fixture, top, 7, "gen[0]");
    let second = instantiate(&mut fixture, top, 7, "gen[1]");
    // Scope of the same scheme instantiated under another container
    let other = fixture.child(top, "other", ScopeKind::Block);
    let stray = instantiate(&mut fixture, other, 7, "gen[0]");

    let report = fixture.elaborate();
    assert!(report.diagnostics.is_empty());
    assert!(fixture.signal(first, "w").is_some());
    assert!(fixture.signal(second, "w").is_some());
    assert!(fixture.signal(stray, "w").is_none());
}

#[test]
fn test_uninstantiated_conditional_is_skipped() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");
    module.generates.push(scheme(&mut fixture, 1, GenerateScheme::Condit, "w"));
    fixture.add_top(module);

    let report = fixture.elaborate();
    assert!(report.diagnostics.is_empty());
    assert_eq!(fixture.design.signal_count(), 0);
}

#[test]
fn test_direct_nested_generate() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");

    let mut outer = Generate::new(GenerateId(0), GenerateScheme::Condit, fixture.sym("outer"), fixture.span());
    outer.direct_nested = true;
    outer.generates.push(scheme(&mut fixture, 1, GenerateScheme::Condit, "skipped"));
    outer.generates.push(scheme(&mut fixture, 2, GenerateScheme::ElseCondit, "taken"));

    // One level of case inside the direct nesting
    let mut case = Generate::new(GenerateId(3), GenerateScheme::Case, fixture.sym("case"), fixture.span());
    case.generates.push(scheme(&mut fixture, 4, GenerateScheme::CaseItem, "arm0"));
    case.generates.push(scheme(&mut fixture, 5, GenerateScheme::CaseItem, "arm1"));
    outer.generates.push(case);
    module.generates.push(outer);

    let top = fixture.add_top(module);
    let taken = instantiate(&mut fixture, top, 2, "g2");
    let arm = instantiate(&mut fixture, top, 5, "g5");

    let report = fixture.elaborate();
    assert!(report.diagnostics.is_empty());
    assert!(fixture.signal(taken, "taken").is_some());
    assert!(fixture.signal(arm, "arm1").is_some());
    assert_eq!(fixture.design.signal_count(), 2);
}

#[test]
fn test_generate_scope_contents() {
    let mut fixture = TestFixture::new();

    let mut sub = fixture.module("sub");
    let span = fixture.span();
    sub.add_wire(Wire::new(fixture.sym("inner"), NetType::Wire, span));
    fixture.pform.add_module(sub);

    let mut module = fixture.module("top");
    let mut block = scheme(&mut fixture, 1, GenerateScheme::Block, "w");
    let (u0, sub_name) = (fixture.sym("u0"), fixture.sym("sub"));
    block.gates.push(Gate::Instance(Instance {
        name: u0,
        module: sub_name,
        span,
    }));
    let nested = scheme(&mut fixture, 2, GenerateScheme::Condit, "deep");
    block.generates.push(nested);
    module.generates.push(block);

    let top = fixture.add_top(module);
    let g1 = instantiate(&mut fixture, top, 1, "g1");
    let g2 = instantiate(&mut fixture, g1, 2, "g2");
    let instance = fixture.design.add_instance(g1, u0, u0, sub_name, span);

    let report = fixture.elaborate();
    assert!(report.diagnostics.is_empty());
    assert!(fixture.signal(g1, "w").is_some());
    assert!(fixture.signal(g2, "deep").is_some());
    assert!(fixture.signal(instance, "inner").is_some());
    assert_eq!(fixture.design.scope_path(g2), "top.g1.g2");
}

#[test]
fn test_module_instances_are_elaborated() {
    let mut fixture = TestFixture::new();

    let mut sub = fixture.module("sub");
    let span = fixture.span();
    sub.add_wire(Wire::new(fixture.sym("x"), NetType::Wire, span));
    fixture.pform.add_module(sub);

    let mut module = fixture.module("top");
    let (u, sub_name, prim) = (fixture.sym("u"), fixture.sym("sub"), fixture.sym("my_udp"));
    module.gates.push(Gate::Instance(Instance {
        name: u,
        module: sub_name,
        span,
    }));
    // No definition: a primitive, never visited
    module.gates.push(Gate::Instance(Instance {
        name: fixture.sym("p"),
        module: prim,
        span,
    }));
    module.gates.push(Gate::Builtin { name: None, span });
    let top = fixture.add_top(module);

    let elements: Vec<ScopeId> = (0..2)
        .map(|index| {
            let element = fixture.sym(&format!("u[{index}]"));
            fixture.design.add_instance(top, u, element, sub_name, span)
        })
        .collect();

    let report = fixture.elaborate();
    assert!(report.diagnostics.is_empty());
    for element in elements {
        assert!(fixture.signal(element, "x").is_some());
    }
}

#[test]
fn test_misparented_instance_is_skipped() {
    let mut fixture = TestFixture::new();

    let mut sub = fixture.module("sub");
    let span = fixture.span();
    sub.add_wire(Wire::new(fixture.sym("x"), NetType::Wire, span));
    fixture.pform.add_module(sub);

    let mut module = fixture.module("top");
    let (u, sub_name) = (fixture.sym("u"), fixture.sym("sub"));
    module.gates.push(Gate::Instance(Instance {
        name: u,
        module: sub_name,
        span,
    }));
    let top = fixture.add_top(module);

    let elsewhere = fixture.child(top, "elsewhere", ScopeKind::Block);
    let stray = fixture.child(elsewhere, "u", ScopeKind::Module { module: sub_name });
    fixture.design.record_instance(top, u, stray);

    let report = fixture.elaborate();
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [ElabError::MisparentedInstance { actual, expected, .. }]
            if actual == "top.elsewhere" && expected == "top"
    ));
    assert!(fixture.signal(stray, "x").is_none());
}

#[test]
fn test_missing_root_module_definition() {
    let mut fixture = TestFixture::new();
    let (name, module) = (fixture.sym("top"), fixture.sym("nowhere"));
    let span = fixture.span();
    fixture.design.add_root(name, module, span);

    let report = fixture.elaborate();
    assert_eq!(report.outcome, Outcome::Failed);
    assert!(matches!(
        report.diagnostics.as_slice(),
        [ElabError::MissingModule { module, .. }] if module == "nowhere"
    ));
}

#[test]
fn test_named_blocks_in_behaviours() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");
    let span = fixture.span();

    let tmp = fixture.sym("tmp");
    let mut wires = FxIndexMap::default();
    wires.insert(tmp, Wire::new(tmp, NetType::Reg, span));
    let inner = Stmt::Block {
        name: Some(fixture.sym("inner")),
        kind: BlockKind::Parallel,
        wires,
        stmts: Vec::new(),
        span,
    };
    let body = Stmt::Forever {
        body: Some(Box::new(Stmt::Condit {
            then_stmt: None,
            else_stmt: Some(Box::new(inner)),
            span,
        })),
        span,
    };
    module.behaviors.push(Process {
        kind: ProcessKind::Always,
        body,
        span,
    });
    let missing = Stmt::Block {
        name: Some(fixture.sym("ghost")),
        kind: BlockKind::Sequential,
        wires: FxIndexMap::default(),
        stmts: vec![Stmt::Other { span }],
        span,
    };
    module.behaviors.push(Process {
        kind: ProcessKind::Initial,
        body: missing,
        span,
    });
    let top = fixture.add_top(module);
    let inner_scope = fixture.child(top, "inner", ScopeKind::Block);

    let report = fixture.elaborate();
    assert!(fixture.signal(inner_scope, "tmp").is_some());
    assert!(matches!(
        report.diagnostics.as_slice(),
        [ElabError::MissingScope { kind: "named block", name, .. }] if name == "ghost"
    ));
}

#[test]
fn test_module_port_header() {
    let mut fixture = TestFixture::new();
    let mut module = fixture.module("top");
    let span = fixture.span();

    let (a, b, c, d, sub) = (
        fixture.sym("a"),
        fixture.sym("b"),
        fixture.sym("c"),
        fixture.sym("d"),
        fixture.sym("sub"),
    );
    module.add_wire(Wire::new(a, NetType::Wire, span).with_port(PortType::Input));
    module.add_wire(Wire::new(b, NetType::Wire, span));
    let port = |path: Vec<_>| PortRef { path, span };
    module.ports = vec![
        Some(Port {
            name: Some(a),
            refs: vec![port(vec![a])],
            span,
        }),
        None,
        Some(Port {
            name: None,
            refs: vec![port(vec![b]), port(vec![c])],
            span,
        }),
        Some(Port {
            name: Some(d),
            refs: vec![port(vec![sub, a])],
            span,
        }),
    ];
    fixture.add_top(module);

    let report = fixture.elaborate();
    let found: Vec<(String, Option<usize>)> = report
        .diagnostics
        .iter()
        .map(|diagnostic| match diagnostic {
            ElabError::MissingPortDirection { name, position, .. } => (format!("direction {name}"), Some(*position)),
            ElabError::UndeclaredPort { name, position, .. } => (format!("undeclared {name}"), Some(*position)),
            ElabError::HierarchicalPort { path, .. } => (format!("hierarchical {path}"), None),
            other => panic!("unexpected diagnostic {other:?}"),
        })
        .collect();
    assert_eq!(
        found,
        [
            ("direction b".to_owned(), Some(3)),
            ("undeclared c".to_owned(), Some(3)),
            ("hierarchical sub.a".to_owned(), None),
        ]
    );
    assert_eq!(report.in_category(ErrorCategory::Structural).count(), 2);
}
