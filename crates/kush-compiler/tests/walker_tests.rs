//! Tests for the generic walker and listener protocol

use kush_compiler::ast::*;
use kush_compiler::{FrontendConfig, Lexer, ParseResult, Parser, Token};

fn parse(source: &str) -> ParseResult {
    let lexed = Lexer::new(source, "walk.kush").tokenize();
    let result = Parser::new(lexed.tokens, &FrontendConfig::default()).parse();
    assert!(result.errors.is_empty(), "parse errors: {:?}", result.errors);
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Enter(NodeId),
    Exit(NodeId),
    Terminal(NodeId),
}

/// Records every callback, touching nothing else.
#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl AstListener for Recorder {
    fn on_enter_every_rule(&mut self, walker: &mut AstWalker<'_>, node: NodeId) {
        if walker.ast().terminal(node).is_none() {
            self.events.push(Event::Enter(node));
        }
    }

    fn on_exit_every_rule(&mut self, _walker: &mut AstWalker<'_>, node: NodeId) {
        self.events.push(Event::Exit(node));
    }

    fn on_visit_terminal(&mut self, _walker: &mut AstWalker<'_>, node: NodeId, _token: &Token) {
        self.events.push(Event::Terminal(node));
    }
}

fn record(result: &ParseResult) -> Vec<Event> {
    let mut recorder = Recorder::default();
    AstWalker::new(&result.ast).walk(&mut recorder, result.root);
    recorder.events
}

/// Terminal texts visited in order.
fn visited_text(result: &ParseResult, events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Terminal(id) => Some(result.ast.text(*id).to_string()),
            _ => None,
        })
        .collect()
}

/// Prunes binary expressions to the selected children.
struct Pruner {
    state: WalkerState,
    inner: Recorder,
}

impl AstListener for Pruner {
    fn on_enter_every_rule(&mut self, walker: &mut AstWalker<'_>, node: NodeId) {
        self.inner.on_enter_every_rule(walker, node);
    }

    fn on_exit_every_rule(&mut self, walker: &mut AstWalker<'_>, node: NodeId) {
        self.inner.on_exit_every_rule(walker, node);
    }

    fn on_visit_terminal(&mut self, walker: &mut AstWalker<'_>, node: NodeId, token: &Token) {
        self.inner.on_visit_terminal(walker, node, token);
    }

    fn enter_additive_expression(
        &mut self,
        walker: &mut AstWalker<'_>,
        _node: NodeId,
        _context: &BinaryExpressionContext,
    ) {
        walker.set_state(self.state);
    }
}

fn pruned(result: &ParseResult, state: WalkerState) -> Vec<Event> {
    let mut pruner = Pruner {
        state,
        inner: Recorder::default(),
    };
    AstWalker::new(&result.ast).walk(&mut pruner, result.root);
    pruner.inner.events
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_pre_and_post_order() {
    let result = parse("class A { function f(x) { if (x) { return x + 1; } } }");
    let events = record(&result);
    let ast = &result.ast;

    let position = |event: &Event| events.iter().position(|e| e == event).unwrap();
    for (id, node) in ast.iter() {
        if ast.terminal(id).is_some() {
            continue;
        }
        let enter = position(&Event::Enter(id));
        let exit = position(&Event::Exit(id));
        assert!(enter < exit);
        for child in node.context.children() {
            let child_first = if ast.terminal(child).is_some() {
                position(&Event::Terminal(child))
            } else {
                position(&Event::Enter(child))
            };
            assert!(enter < child_first, "{} entered after child {}", id, child);
            if ast.terminal(child).is_none() {
                assert!(position(&Event::Exit(child)) < exit, "{} exited before child {}", id, child);
            }
        }
    }
}

#[test]
fn test_every_node_visited_once() {
    let result = parse("function f(a, ...b) { var m = {1: [a]}; }");
    let events = record(&result);
    let visited = events
        .iter()
        .filter(|e| matches!(e, Event::Enter(_) | Event::Terminal(_)))
        .count();
    assert_eq!(visited, result.ast.len());
}

#[test]
fn test_rewalk_is_deterministic() {
    let result = parse("class A extends B { new() { x = y ? 1 : 2; } }");
    assert_eq!(record(&result), record(&result));
}

// ============================================================================
// Child selection
// ============================================================================

#[test]
fn test_even_and_odd_against_baseline() {
    let result = parse("function f() { r = a - b + c; }");

    let baseline = visited_text(&result, &record(&result));
    assert_eq!(baseline, vec!["f", "r", "=", "a", "-", "b", "+", "c"]);

    let even = visited_text(&result, &pruned(&result, WalkerState::VisitEvenChildren));
    assert_eq!(even, vec!["f", "r", "=", "a", "b", "c"]);

    let odd = visited_text(&result, &pruned(&result, WalkerState::VisitOddChildren));
    assert_eq!(odd, vec!["f", "r", "=", "-", "+"]);
}

#[test]
fn test_skip_first_last_extreme() {
    let result = parse("function f() { r = a - b + c; }");

    let skipped = visited_text(&result, &pruned(&result, WalkerState::SkipChildren));
    assert_eq!(skipped, vec!["f", "r", "="]);

    let first = visited_text(&result, &pruned(&result, WalkerState::VisitFirstChild));
    assert_eq!(first, vec!["f", "r", "=", "a"]);

    let last = visited_text(&result, &pruned(&result, WalkerState::VisitLastChild));
    assert_eq!(last, vec!["f", "r", "=", "c"]);

    let extremes = visited_text(&result, &pruned(&result, WalkerState::VisitExtremeChildren));
    assert_eq!(extremes, vec!["f", "r", "=", "a", "c"]);
}

#[test]
fn test_pruned_node_still_exits() {
    let result = parse("function f() { r = a + b; }");
    let events = pruned(&result, WalkerState::SkipChildren);
    let additive = result
        .ast
        .iter()
        .find(|(_, n)| n.kind() == NodeKind::AdditiveExpression)
        .map(|(id, _)| id)
        .unwrap();
    assert!(events.contains(&Event::Enter(additive)));
    assert!(events.contains(&Event::Exit(additive)));
}

#[test]
fn test_state_resets_per_node() {
    struct SkipClasses {
        functions: usize,
    }

    impl AstListener for SkipClasses {
        fn enter_class_declaration(
            &mut self,
            walker: &mut AstWalker<'_>,
            _node: NodeId,
            _context: &ClassDeclarationContext,
        ) {
            walker.set_state(WalkerState::SkipChildren);
        }

        fn enter_function_declaration(
            &mut self,
            _walker: &mut AstWalker<'_>,
            _node: NodeId,
            _context: &FunctionDeclarationContext,
        ) {
            self.functions += 1;
        }
    }

    let result = parse("class A { function hidden() {} } function visible() {}");
    let mut listener = SkipClasses { functions: 0 };
    AstWalker::new(&result.ast).walk(&mut listener, result.root);
    assert_eq!(listener.functions, 1);
}

// ============================================================================
// Annotations and foreign ids
// ============================================================================

#[test]
fn test_annotations_side_table() {
    struct Depths {
        depth: usize,
        table: AstAnnotations<usize>,
    }

    impl AstListener for Depths {
        fn on_enter_every_rule(&mut self, walker: &mut AstWalker<'_>, node: NodeId) {
            self.table.insert(node, self.depth);
            if walker.ast().terminal(node).is_none() {
                self.depth += 1;
            }
        }

        fn on_exit_every_rule(&mut self, _walker: &mut AstWalker<'_>, _node: NodeId) {
            self.depth -= 1;
        }
    }

    let result = parse("function f() {}");
    let mut depths = Depths {
        depth: 0,
        table: AstAnnotations::new(),
    };
    AstWalker::new(&result.ast).walk(&mut depths, result.root);

    assert_eq!(depths.table.len(), result.ast.len());
    assert_eq!(depths.table.get(result.root), Some(&0));
    assert_eq!(depths.depth, 0);
}

#[test]
#[should_panic(expected = "does not belong")]
fn test_foreign_node_panics() {
    let small = parse("function f() {}");
    let large = parse("class A { function f() { var x = 1; } }");
    let foreign = large.root;
    assert!(foreign.index() >= small.ast.len());

    let mut recorder = Recorder::default();
    AstWalker::new(&small.ast).walk(&mut recorder, foreign);
}
