//! End-to-end engine tests: loop semantics, echo stack evaluation,
//! numeric promotion, the builtin catalog, and runtime failures.

use smartscript_engine::{render, BufferSink, EvalError, RenderError, Sink};
use smartscript_types::SourceFile;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn source(text: &str) -> SourceFile {
    SourceFile::new("test.smscr", text)
}

/// Render a document to a fresh buffer sink and return the output.
fn render_to_string(text: &str) -> String {
    let mut sink = BufferSink::new();
    render(&source(text), &mut sink).expect("document should render");
    sink.output().to_string()
}

/// Render and return the evaluation error it produces.
fn render_err(text: &str) -> EvalError {
    let mut sink = BufferSink::new();
    match render(&source(text), &mut sink) {
        Err(RenderError::Eval(err)) => err,
        Err(RenderError::Parse(err)) => panic!("expected an eval error, got parse error: {err}"),
        Ok(()) => panic!("expected an eval error, document rendered fine"),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Literal text
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn literal_text_passes_through_verbatim() {
    assert_eq!(render_to_string("plain text\nwith lines"), "plain text\nwith lines");
}

#[test]
fn escaped_tag_opener_renders_literally() {
    assert_eq!(render_to_string(r"a \{$ b"), "a {$ b");
}

// ══════════════════════════════════════════════════════════════════════════════
// FOR loops
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn default_step_loop_is_inclusive() {
    assert_eq!(render_to_string("{$FOR i 1 5 $}{$=i$}{$END$}"), "12345");
}

#[test]
fn explicit_step_stops_past_end() {
    assert_eq!(render_to_string("{$FOR i 0 3 2$}{$=i$}{$END$}"), "02");
}

#[test]
fn loop_with_start_past_end_runs_zero_times() {
    assert_eq!(render_to_string("{$FOR i 5 1$}{$=i$}{$END$}never:"), "never:");
}

#[test]
fn float_step_promotes_the_counter() {
    // 1 (int), then 1.5 and 2.0 after integer+double promotion.
    assert_eq!(render_to_string("{$FOR i 1 2 0.5$}{$=i$} {$END$}"), "1 1.5 2.0 ");
}

#[test]
fn string_bounds_coerce_numerically() {
    assert_eq!(
        render_to_string(r#"{$FOR i "1" "3"$}{$=i$}{$END$}"#),
        "123"
    );
}

#[test]
fn nested_loops_with_the_same_variable_stay_independent() {
    // The inner loop shadows `i`; the outer counter resumes unharmed.
    let out = render_to_string("{$FOR i 1 2$}[{$=i$}:{$FOR i 7 8$}{$=i$}{$END$}]{$END$}");
    assert_eq!(out, "[1:78][2:78]");
}

#[test]
fn outer_variable_is_readable_as_inner_bound() {
    assert_eq!(
        render_to_string("{$FOR i 1 3$}{$FOR j i 3$}{$=j$}{$END$};{$END$}"),
        "123;23;3;"
    );
}

#[test]
fn unbound_loop_bound_fails() {
    let err = render_err("{$FOR i n 5$}{$END$}");
    assert_eq!(err, EvalError::UnboundVariable("n".into()));
}

#[test]
fn non_numeric_string_bound_fails_at_comparison() {
    let err = render_err(r#"{$FOR i 1 "lots"$}{$END$}"#);
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Echo tags: stack evaluation and promotion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn integers_stay_integers() {
    assert_eq!(render_to_string("{$= 2 3 + $}"), "5");
}

#[test]
fn adding_a_double_widens() {
    assert_eq!(render_to_string("{$= 2 1.0 + $}"), "3.0");
}

#[test]
fn first_pop_is_the_right_operand() {
    // 10 - 4, not 4 - 10.
    assert_eq!(render_to_string("{$= 10 4 - $}"), "6");
    assert_eq!(render_to_string("{$= 8 2 / $}"), "4");
}

#[test]
fn power_operator() {
    assert_eq!(render_to_string("{$= 2 10 ^ $}"), "1024");
}

#[test]
fn leftover_values_print_bottom_to_top() {
    assert_eq!(render_to_string("{$= 1 2 3 $}"), "123");
    assert_eq!(render_to_string(r#"{$= "a" 1 2 + "b" $}"#), "a3b");
}

#[test]
fn numeric_string_operand_coerces() {
    assert_eq!(render_to_string(r#"{$= "3" 4 * $}"#), "12");
}

#[test]
fn non_numeric_string_operand_is_a_type_error() {
    let err = render_err(r#"{$= "abc" 3 + $}"#);
    assert!(matches!(err, EvalError::TypeMismatch(_)));
}

#[test]
fn unbound_variable_in_echo_fails() {
    let err = render_err("{$= ghost $}");
    assert_eq!(err, EvalError::UnboundVariable("ghost".into()));
}

#[test]
fn operator_without_operands_underflows() {
    let err = render_err("{$= 1 + $}");
    assert!(matches!(err, EvalError::StackUnderflow(_)));
}

#[test]
fn output_before_the_failure_stays_written() {
    let mut sink = BufferSink::new();
    let result = render(&source(r#"kept{$= "abc" 3 + $}"#), &mut sink);
    assert!(result.is_err());
    assert_eq!(sink.output(), "kept");
}

// ══════════════════════════════════════════════════════════════════════════════
// Builtin functions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn sin_takes_degrees() {
    assert_eq!(render_to_string("{$= 0 @sin $}"), "0.0");
    // sin(30°) = 0.5 exactly enough for decfmt.
    assert_eq!(render_to_string(r#"{$= 30 @sin "0.000" @decfmt $}"#), "0.500");
}

#[test]
fn decfmt_formats_the_value_below_the_pattern() {
    assert_eq!(render_to_string(r#"{$= 3.14159 "0.00" @decfmt $}"#), "3.14");
}

#[test]
fn dup_duplicates_the_top() {
    assert_eq!(render_to_string("{$= 5 @dup * $}"), "25");
}

#[test]
fn swap_exchanges_the_top_two() {
    assert_eq!(render_to_string("{$= 1 2 @swap $}"), "21");
    assert_eq!(render_to_string("{$= 10 4 @swap - $}"), "-6");
}

#[test]
fn set_mime_type_side_effects_the_sink() {
    let mut sink = BufferSink::new();
    render(&source(r#"{$= "text/plain" @setMimeType $}"#), &mut sink).unwrap();
    assert_eq!(sink.mime_type(), Some("text/plain"));
    assert_eq!(sink.output(), "", "setMimeType pushes nothing");
}

#[test]
fn param_get_reads_the_request_store() {
    let mut sink = BufferSink::with_request_params([("broj", "4")]);
    render(&source(r#"{$= "broj" "3" @paramGet $}"#), &mut sink).unwrap();
    assert_eq!(sink.output(), "4");
}

#[test]
fn param_get_falls_back_to_the_default() {
    let mut sink = BufferSink::new();
    render(&source(r#"{$= "broj" "3" @paramGet $}"#), &mut sink).unwrap();
    assert_eq!(sink.output(), "3");
}

#[test]
fn persistent_params_write_through_and_read_back() {
    let mut sink = BufferSink::new();
    render(
        &source(r#"{$= 42 "answer" @pparamSet $}{$= "answer" "none" @pparamGet $}"#),
        &mut sink,
    )
    .unwrap();
    assert_eq!(sink.output(), "42");
    assert_eq!(sink.persistent_param("answer").as_deref(), Some("42"));
}

#[test]
fn temporary_params_are_a_separate_store() {
    let mut sink = BufferSink::new();
    render(
        &source(r#"{$= "t" "tmp" @tparamSet $}{$= "tmp" "miss" @pparamGet $}"#),
        &mut sink,
    )
    .unwrap();
    // The persistent store never saw the temporary write.
    assert_eq!(sink.output(), "miss");
    assert_eq!(sink.temporary_param("tmp").as_deref(), Some("t"));
}

#[test]
fn param_delete_removes_the_entry() {
    let mut sink = BufferSink::new();
    render(
        &source(
            r#"{$= 1 "k" @pparamSet $}{$= "k" @pparamDel $}{$= "k" "gone" @pparamGet $}"#,
        ),
        &mut sink,
    )
    .unwrap();
    assert_eq!(sink.output(), "gone");
    assert_eq!(sink.persistent_param("k"), None);
}

#[test]
fn unknown_function_is_a_runtime_error() {
    let err = render_err("{$= 1 @frobnicate $}");
    assert_eq!(err, EvalError::UnknownFunction("frobnicate".into()));
}

// ══════════════════════════════════════════════════════════════════════════════
// Whole documents
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn mixed_document_renders_in_order() {
    let doc = "This is sample text.\n\
               {$ FOR i 1 3 1 $}\n This is {$= i $}-th time this message is generated.\n{$END$}";
    let out = render_to_string(doc);
    assert_eq!(
        out,
        "This is sample text.\n\
         \n This is 1-th time this message is generated.\n\
         \n This is 2-th time this message is generated.\n\
         \n This is 3-th time this message is generated.\n"
    );
}

#[test]
fn squares_table() {
    let doc = "{$FOR i 1 4$}{$= i i * $} {$END$}";
    assert_eq!(render_to_string(doc), "1 4 9 16 ");
}
