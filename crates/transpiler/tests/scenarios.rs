//! End-to-end transpile scenarios: whole Blueprints in, emitted script out.

use uscript::{transpile_to_file, transpile_to_string, DiagnosticSink, TranspileOptions};
use uscript_graph::{
    Blueprint, BlueprintGraph, GraphKind, NodeId, PinDirection, PinId, PinType,
};

fn wrap(graph: BlueprintGraph) -> Blueprint {
    let mut bp = Blueprint::new("BP_Test", "Actor");
    bp.add_graph(graph);
    bp
}

fn transpile(bp: &Blueprint) -> (String, DiagnosticSink) {
    transpile_to_string(bp, &TranspileOptions::default())
}

/// FunctionEntry named `name` with a `then` pin.
fn add_entry(graph: &mut BlueprintGraph, name: &str) -> (NodeId, PinId) {
    let entry = graph.add_node("FunctionEntry");
    graph.node_mut(entry).member_name = Some(name.to_string());
    let then = graph.add_pin(entry, "then", PinDirection::Output, PinType::exec());
    (entry, then)
}

/// CallFunction with exec in/out pins.
fn add_call(graph: &mut BlueprintGraph, callee: &str) -> (NodeId, PinId, PinId) {
    let call = graph.add_node("CallFunction");
    graph.node_mut(call).member_name = Some(callee.to_string());
    let exec = graph.add_pin(call, "exec", PinDirection::Input, PinType::exec());
    let then = graph.add_pin(call, "then", PinDirection::Output, PinType::exec());
    (call, exec, then)
}

#[test]
fn test_event_without_successor_emits_empty_handler() {
    let mut graph = BlueprintGraph::new("EventGraph", GraphKind::Ubergraph);
    let event = graph.add_node("Event");
    graph.node_mut(event).member_name = Some("ReceiveBeginPlay".to_string());
    graph.node_mut(event).description = "Event when play begins for this actor.".to_string();
    graph.add_pin(event, "then", PinDirection::Output, PinType::exec());

    let (text, sink) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("  def On_ReceiveBeginPlay(self):"));
    assert!(text.contains("    \"\"\"Event when play begins for this actor.\"\"\""));
    // Only the handler definition; nothing dangles after it.
    assert_eq!(text.matches("def ").count(), 1);
    assert!(!text.contains("MissingLink"));
    assert!(sink.is_empty(), "unexpected diagnostics: {:?}", sink.iter().collect::<Vec<_>>());
}

#[test]
fn test_call_with_literal_defaults() {
    let mut graph = BlueprintGraph::new("DoThing", GraphKind::Function);
    let call = graph.add_node("CallFunction");
    graph.node_mut(call).member_name = Some("DoThing".to_string());
    graph.add_pin(call, "then", PinDirection::Output, PinType::exec());
    let a = graph.add_pin(call, "Count", PinDirection::Input, PinType::int());
    graph.pin_mut(a).default_value = Some("5".to_string());
    let b = graph.add_pin(call, "bForce", PinDirection::Input, PinType::boolean());
    graph.pin_mut(b).default_value = Some("true".to_string());
    graph.add_pin(call, "ReturnValue", PinDirection::Output, PinType::boolean());

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    // Literal rendering: numbers verbatim, booleans remapped.
    assert!(text.contains("Count = 5,"));
    assert!(text.contains("bForce = True,"));
    // The reserved output name forces a synthesized assignment target.
    assert!(text.contains("bool_0 = DoThing("));
}

#[test]
fn test_branch_with_unlinked_else_has_no_else_block() {
    let mut graph = BlueprintGraph::new("CheckReady", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "CheckReady");

    let getter = graph.add_node("VariableGet");
    graph.node_mut(getter).member_name = Some("bReady".to_string());
    let flag = graph.add_pin(getter, "bReady", PinDirection::Output, PinType::boolean());

    let branch = graph.add_node("IfThenElse");
    let branch_exec = graph.add_pin(branch, "exec", PinDirection::Input, PinType::exec());
    let condition = graph.add_pin(branch, "Condition", PinDirection::Input, PinType::boolean());
    let then = graph.add_pin(branch, "then", PinDirection::Output, PinType::exec());
    graph.add_pin(branch, "else", PinDirection::Output, PinType::exec());

    let (_, call_exec, _) = add_call(&mut graph, "Celebrate");

    graph.connect(entry_then, branch_exec).unwrap();
    graph.connect(flag, condition).unwrap();
    graph.connect(then, call_exec).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("    if bReady:"));
    assert!(text.contains("      Celebrate()"));
    assert!(!text.contains("else:"));
}

#[test]
fn test_pass_through_chain_is_invisible() {
    // Producer -> two chained knots -> consumer, with the producer also the
    // consumer's control-flow predecessor.
    let mut graph = BlueprintGraph::new("Chained", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Chained");

    let (producer, producer_exec, producer_then) = add_call(&mut graph, "GetScore");
    let out = graph.add_pin(producer, "ReturnValue", PinDirection::Output, PinType::int());

    let knot1 = graph.add_node("Knot");
    let k1_in = graph.add_pin(knot1, "InputPin", PinDirection::Input, PinType::wildcard());
    let k1_out = graph.add_pin(knot1, "OutputPin", PinDirection::Output, PinType::wildcard());
    let knot2 = graph.add_node("Knot");
    let k2_in = graph.add_pin(knot2, "InputPin", PinDirection::Input, PinType::wildcard());
    let k2_out = graph.add_pin(knot2, "OutputPin", PinDirection::Output, PinType::wildcard());

    let (consumer, consumer_exec, _) = add_call(&mut graph, "SetScore");
    let value = graph.add_pin(consumer, "Value", PinDirection::Input, PinType::int());

    graph.connect(entry_then, producer_exec).unwrap();
    graph.connect(producer_then, consumer_exec).unwrap();
    graph.connect(out, k1_in).unwrap();
    graph.connect(k1_out, k2_in).unwrap();
    graph.connect(k2_out, value).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    // Producer first, consumer second, nothing attributable to the knots.
    assert_eq!(text.matches("# CallFunction").count(), 2);
    assert!(text.contains("Value = GetScore()"));
    assert!(text.contains("SetScore("));
    assert!(text.contains("Value = Value,"));
    let producer_at = text.find("GetScore").unwrap();
    let consumer_at = text.find("SetScore").unwrap();
    assert!(producer_at < consumer_at);
}

#[test]
fn test_pass_through_transparency_matches_direct_link() {
    fn build(with_knot: bool) -> Blueprint {
        let mut graph = BlueprintGraph::new("Chained", GraphKind::Function);
        let (_, entry_then) = add_entry(&mut graph, "Chained");

        let (producer, producer_exec, producer_then) = add_call(&mut graph, "GetScore");
        let out = graph.add_pin(producer, "ReturnValue", PinDirection::Output, PinType::int());

        let (consumer, consumer_exec, _) = add_call(&mut graph, "SetScore");
        let value = graph.add_pin(consumer, "Value", PinDirection::Input, PinType::int());

        graph.connect(entry_then, producer_exec).unwrap();
        graph.connect(producer_then, consumer_exec).unwrap();

        if with_knot {
            let knot = graph.add_node("Knot");
            let k_in = graph.add_pin(knot, "InputPin", PinDirection::Input, PinType::wildcard());
            let k_out = graph.add_pin(knot, "OutputPin", PinDirection::Output, PinType::wildcard());
            graph.connect(out, k_in).unwrap();
            graph.connect(k_out, value).unwrap();
        } else {
            graph.connect(out, value).unwrap();
        }

        wrap(graph)
    }

    let (direct, _) = transpile(&build(false));
    let (rerouted, _) = transpile(&build(true));
    assert_eq!(direct, rerouted);
}

#[test]
fn test_diamond_emits_shared_node_once_with_diagnostic() {
    let mut graph = BlueprintGraph::new("Diamond", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Diamond");

    let branch = graph.add_node("IfThenElse");
    let branch_exec = graph.add_pin(branch, "exec", PinDirection::Input, PinType::exec());
    let condition = graph.add_pin(branch, "Condition", PinDirection::Input, PinType::boolean());
    graph.pin_mut(condition).default_value = Some("true".to_string());
    let then = graph.add_pin(branch, "then", PinDirection::Output, PinType::exec());
    let els = graph.add_pin(branch, "else", PinDirection::Output, PinType::exec());

    let (_, shared_exec, _) = add_call(&mut graph, "DoIt");

    graph.connect(entry_then, branch_exec).unwrap();
    graph.connect(then, shared_exec).unwrap();
    graph.connect(els, shared_exec).unwrap();

    let (text, sink) = transpile(&wrap(graph));
    println!("{text}");

    assert_eq!(text.matches("DoIt()").count(), 1);
    assert!(sink.warnings().any(|d| d.message.contains("already emitted")));
}

#[test]
fn test_control_flow_cycle_terminates() {
    let mut graph = BlueprintGraph::new("Loop", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Loop");

    let (_, x_exec, x_then) = add_call(&mut graph, "StepOne");
    let (_, y_exec, y_then) = add_call(&mut graph, "StepTwo");

    graph.connect(entry_then, x_exec).unwrap();
    graph.connect(x_then, y_exec).unwrap();
    // Back edge: StepTwo's successor is StepOne again.
    graph.connect(y_then, x_exec).unwrap();

    let (text, sink) = transpile(&wrap(graph));
    println!("{text}");

    assert_eq!(text.matches("StepOne()").count(), 1);
    assert_eq!(text.matches("StepTwo()").count(), 1);
    assert!(sink.warnings().any(|d| d.message.contains("already emitted")));
}

#[test]
fn test_repeated_passes_are_byte_identical() {
    fn build() -> Blueprint {
        let mut graph = BlueprintGraph::new("Chained", GraphKind::Function);
        let (_, entry_then) = add_entry(&mut graph, "Chained");
        let (producer, producer_exec, producer_then) = add_call(&mut graph, "GetScore");
        let out = graph.add_pin(producer, "ReturnValue", PinDirection::Output, PinType::int());
        let (consumer, consumer_exec, _) = add_call(&mut graph, "SetScore");
        let value = graph.add_pin(consumer, "Value", PinDirection::Input, PinType::int());
        graph.connect(entry_then, producer_exec).unwrap();
        graph.connect(producer_then, consumer_exec).unwrap();
        graph.connect(out, value).unwrap();
        wrap(graph)
    }

    let (first, _) = transpile(&build());
    let (second, _) = transpile(&build());
    assert_eq!(first, second);
}

#[test]
fn test_memoized_producer_feeds_two_consumers() {
    let mut graph = BlueprintGraph::new("Shared", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Shared");

    let (producer, producer_exec, producer_then) = add_call(&mut graph, "GetScore");
    let out = graph.add_pin(producer, "ReturnValue", PinDirection::Output, PinType::int());

    let (first, first_exec, first_then) = add_call(&mut graph, "ShowScore");
    let first_in = graph.add_pin(first, "Value", PinDirection::Input, PinType::int());
    let (second, second_exec, _) = add_call(&mut graph, "SaveScore");
    let second_in = graph.add_pin(second, "Value", PinDirection::Input, PinType::int());

    graph.connect(entry_then, producer_exec).unwrap();
    graph.connect(producer_then, first_exec).unwrap();
    graph.connect(first_then, second_exec).unwrap();
    graph.connect(out, first_in).unwrap();
    graph.connect(out, second_in).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    // One producing statement, one shared name for both uses.
    assert_eq!(text.matches("GetScore()").count(), 1);
    assert_eq!(text.matches("Value = Value,").count(), 2);
}

#[test]
fn test_function_result_returns_extracted_names() {
    let mut graph = BlueprintGraph::new("GetLocation", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "GetLocation");

    let (producer, producer_exec, producer_then) = add_call(&mut graph, "TraceUnderCursor");
    let hit = graph.add_pin(producer, "ReturnValue", PinDirection::Output, PinType::boolean());
    let loc = graph.add_pin(producer, "Location", PinDirection::Output, PinType::strukt("Vector"));

    let result = graph.add_node("FunctionResult");
    let result_exec = graph.add_pin(result, "exec", PinDirection::Input, PinType::exec());
    let r_hit = graph.add_pin(result, "Hit", PinDirection::Input, PinType::boolean());
    let r_loc = graph.add_pin(result, "Location", PinDirection::Input, PinType::strukt("Vector"));

    graph.connect(entry_then, producer_exec).unwrap();
    graph.connect(producer_then, result_exec).unwrap();
    graph.connect(hit, r_hit).unwrap();
    graph.connect(loc, r_loc).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("Hit = Hit"));
    assert!(text.contains("Location = Location"));
    assert!(text.contains("return Hit, Location"));
}

#[test]
fn test_class_header_variables_and_region_order() {
    let mut bp = Blueprint::new("BP_TopDownController", "PlayerController");
    bp.description = "PlayerController Blueprint handles clicking.".to_string();
    bp.variables.push(uscript_graph::VariableDecl {
        name: "PressedThreshold".to_string(),
        var_type: "real".to_string(),
        default_value: None,
    });

    let mut events = BlueprintGraph::new("EventGraph", GraphKind::Ubergraph);
    let event = events.add_node("Event");
    events.node_mut(event).member_name = Some("ReceiveBeginPlay".to_string());
    events.add_pin(event, "then", PinDirection::Output, PinType::exec());
    bp.add_graph(events);

    let mut function = BlueprintGraph::new("MoveTo", GraphKind::Function);
    add_entry(&mut function, "MoveTo");
    bp.add_graph(function);

    let (text, _) = transpile(&bp);
    println!("{text}");

    assert!(text.starts_with("from unreal import *\n"));
    assert!(text.contains("class BP_TopDownController(PlayerController):"));
    assert!(text.contains("  \"\"\"PlayerController Blueprint handles clicking.\"\"\""));
    assert!(text.contains("  PressedThreshold: real = DefaultSubObject()"));
    // Function bodies come before event pages even when authored after.
    let function_at = text.find("def MoveTo").unwrap();
    let event_at = text.find("def On_ReceiveBeginPlay").unwrap();
    assert!(function_at < event_at);
}

#[test]
fn test_empty_region_produces_no_output_for_it() {
    let mut bp = Blueprint::new("BP_Empty", "Actor");
    bp.add_graph(BlueprintGraph::new("EventGraph", GraphKind::Ubergraph));

    let (text, sink) = transpile(&bp);
    assert!(!text.contains("def "));
    assert!(sink.is_empty());
}

#[test]
fn test_input_action_dispatch() {
    let mut graph = BlueprintGraph::new("EventGraph", GraphKind::Ubergraph);
    let action = graph.add_node("InputAction");
    graph.node_mut(action).member_name = Some("IA_Move".to_string());
    let triggered = graph.add_pin(action, "Triggered", PinDirection::Output, PinType::exec());
    graph.add_pin(action, "Completed", PinDirection::Output, PinType::exec());
    graph.add_pin(action, "ActionValue", PinDirection::Output, PinType::strukt("Vector"));

    let (_, call_exec, _) = add_call(&mut graph, "Move");
    graph.connect(triggered, call_exec).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("def OnAction_IA_Move(self, trigger_event, ActionValue):"));
    assert!(text.contains("match trigger_event:"));
    assert!(text.contains("case Triggered:"));
    assert!(text.contains("Move()"));
    // Unlinked case degrades to pass.
    assert!(text.contains("case Completed:"));
    assert!(text.contains("pass"));
}

#[test]
fn test_macro_instance_multi_exit_dispatch() {
    let mut graph = BlueprintGraph::new("Gated", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Gated");

    let macro_node = graph.add_node("MacroInstance");
    graph.node_mut(macro_node).macro_graph = Some("Gate".to_string());
    let macro_exec = graph.add_pin(macro_node, "exec", PinDirection::Input, PinType::exec());
    let opened = graph.add_pin(macro_node, "Opened", PinDirection::Output, PinType::exec());
    graph.add_pin(macro_node, "Closed", PinDirection::Output, PinType::exec());

    let (_, call_exec, _) = add_call(&mut graph, "Proceed");

    graph.connect(entry_then, macro_exec).unwrap();
    graph.connect(opened, call_exec).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("match Gate():"));
    assert!(text.contains("case Opened:"));
    assert!(text.contains("Proceed()"));
    assert!(text.contains("case Closed:"));
}

#[test]
fn test_variable_set_binds_qualified_name() {
    let mut graph = BlueprintGraph::new("Cache", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Cache");

    let setter = graph.add_node("VariableSet");
    graph.node_mut(setter).member_name = Some("CachedDestination".to_string());
    let set_exec = graph.add_pin(setter, "exec", PinDirection::Input, PinType::exec());
    let set_then = graph.add_pin(setter, "then", PinDirection::Output, PinType::exec());
    let set_value = graph.add_pin(setter, "CachedDestination", PinDirection::Input, PinType::strukt("Vector"));
    graph.pin_mut(set_value).default_value = Some("0,0,0".to_string());
    let set_out = graph.add_pin(setter, "Output", PinDirection::Output, PinType::strukt("Vector"));

    let (consumer, consumer_exec, _) = add_call(&mut graph, "Report");
    let consumer_in = graph.add_pin(consumer, "Location", PinDirection::Input, PinType::strukt("Vector"));

    graph.connect(entry_then, set_exec).unwrap();
    graph.connect(set_then, consumer_exec).unwrap();
    graph.connect(set_out, consumer_in).unwrap();

    let (text, _) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("self.CachedDestination = (0,0,0)"));
    assert!(text.contains("Location = self.CachedDestination,"));
}

#[test]
fn test_unknown_node_kind_degrades_to_diagnostic() {
    let mut graph = BlueprintGraph::new("Weird", GraphKind::Function);
    let (_, entry_then) = add_entry(&mut graph, "Weird");

    let strange = graph.add_node("Timeline");
    let strange_exec = graph.add_pin(strange, "exec", PinDirection::Input, PinType::exec());
    graph.connect(entry_then, strange_exec).unwrap();

    let (text, sink) = transpile(&wrap(graph));
    println!("{text}");

    assert!(text.contains("def Weird():"));
    assert!(sink.warnings().any(|d| d.message.contains("Unknown node class Timeline")));
}

#[test]
fn test_transpile_to_file_places_script_deterministically() {
    let dir = tempfile::tempdir().unwrap();

    let mut graph = BlueprintGraph::new("EventGraph", GraphKind::Ubergraph);
    let event = graph.add_node("Event");
    graph.node_mut(event).member_name = Some("ReceiveBeginPlay".to_string());
    graph.add_pin(event, "then", PinDirection::Output, PinType::exec());
    let bp = wrap(graph);

    let sink = transpile_to_file(&bp, dir.path(), &TranspileOptions::default());
    assert!(sink.is_empty());

    let path = dir.path().join("Scripts").join("BP_Test.us");
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.contains("def On_ReceiveBeginPlay(self):"));
}
