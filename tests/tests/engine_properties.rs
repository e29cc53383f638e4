//! Transducer engine properties.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

fn program(rules: Vec<MttRule>) -> MttEngine {
    let mut program = MttProgram::new("q");
    for rule in rules {
        program.push(rule);
    }
    MttEngine::new(program)
}

fn leaf(kind: &str) -> TreeNode {
    TreeNode::new(kind)
}

mod identity_fallback {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unmatched_tree_is_returned_unchanged() {
        let engine = program(vec![MttRule::new(
            "only_x",
            "q",
            TreePattern::kind("x"),
            TreeTemplate::node("y"),
        )]);
        let tree = TreeNode::new("a")
            .named("root")
            .with_attr("n", 1i64)
            .with_child(leaf("x").with_child(leaf("x")));

        assert_eq!(engine.transform("q", &tree, &[]).unwrap(), tree);
    }

    #[test]
    fn test_state_without_matching_rules_copies_input() {
        let engine = program(vec![MttRule::new(
            "guarded",
            "q",
            TreePattern::kind("e"),
            TreeTemplate::node("never"),
        )
        .with_guard(Expression::literal(false))]);

        assert_eq!(engine.transform("q", &leaf("e"), &[]).unwrap(), leaf("e"));
    }
}

mod positional_arity {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_child_pattern_count_must_match() {
        let two = TreePattern::kind("a").with_children([TreePattern::wildcard(), TreePattern::wildcard()]);
        let none = TreePattern::kind("a").with_children(Vec::new());
        let engine = program(vec![
            MttRule::new("two", "q", two, TreeTemplate::node("two")),
            MttRule::new("none", "q", none, TreeTemplate::node("none")),
        ]);

        let cases = [
            (leaf("a"), "none"),
            (leaf("a").with_child(leaf("b")), "a"),
            (leaf("a").with_child(leaf("b")).with_child(leaf("c")), "two"),
            (
                leaf("a").with_children([leaf("b"), leaf("c"), leaf("d")]),
                "a",
            ),
        ];
        for (tree, expected) in cases {
            assert_eq!(engine.transform("q", &tree, &[]).unwrap().kind, expected, "{}", tree);
        }
    }
}

mod rule_priority {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_earlier_rule_wins() {
        let engine = program(vec![
            MttRule::new("first", "q", TreePattern::kind("e"), TreeTemplate::node("first")),
            MttRule::new("second", "q", TreePattern::kind("e"), TreeTemplate::node("second")),
        ]);
        assert_eq!(engine.transform("q", &leaf("e"), &[]).unwrap().kind, "first");
    }

    #[test]
    fn test_failed_guard_yields_to_next_rule() {
        let engine = program(vec![
            MttRule::new("big", "q", TreePattern::kind("e").bind("n"), TreeTemplate::node("big"))
                .with_guard(Expression::binary(">", Expression::var_prop("n", "size"), Expression::literal(10i64))),
            MttRule::new("small", "q", TreePattern::kind("e"), TreeTemplate::node("small")),
        ]);

        let big = leaf("e").with_attr("size", 50i64);
        let small = leaf("e").with_attr("size", 5i64);
        assert_eq!(engine.transform("q", &big, &[]).unwrap().kind, "big");
        assert_eq!(engine.transform("q", &small, &[]).unwrap().kind, "small");
    }
}

mod parameter_threading {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_param_reaches_attribute() {
        // GIVEN
        let engine = program(vec![MttRule::new(
            "wrap",
            "q",
            TreePattern::kind("e"),
            TreeTemplate::node("wrapped")
                .with_attr("label", Expression::var("param0"))
                .with_child(TreeTemplate::node("e")),
        )
        .with_parameters(["label"])]);

        // WHEN
        let out = engine.transform("q", &leaf("e"), &[Value::from("test_label")]).unwrap();

        // THEN
        assert_eq!(
            out,
            TreeNode::new("wrapped")
                .with_attr("label", "test_label")
                .with_child(leaf("e"))
        );
    }

    #[test]
    fn test_params_thread_across_states() {
        let engine = program(vec![
            MttRule::new(
                "outer",
                "q",
                TreePattern::kind("box").with_children([TreePattern::var("inner")]),
                TreeTemplate::node("boxed").with_child(TreeTemplate::call(
                    "tag",
                    "inner",
                    vec![Expression::binary("+", Expression::var("param0"), Expression::literal(1i64))],
                )),
            ),
            MttRule::new(
                "tag",
                "tag",
                TreePattern::wildcard(),
                TreeTemplate::node("tagged").with_attr("level", Expression::var("level")),
            )
            .with_parameters(["level"]),
        ]);

        let tree = leaf("box").with_child(leaf("item"));
        let out = engine.transform("q", &tree, &[Value::Int(41)]).unwrap();
        assert_tree(&out)
            .kind("boxed")
            .child(0, |c| {
                c.kind("tagged").attr("level", 42i64);
            });
    }
}

mod structural_copy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_copy_preserves_arity_and_order() {
        let engine = program(vec![
            MttRule::new(
                "copy_a",
                "q",
                TreePattern::kind("a").with_children([TreePattern::var("x1"), TreePattern::var("x2")]),
                TreeTemplate::node("a")
                    .with_child(TreeTemplate::var("x1"))
                    .with_child(TreeTemplate::var("x2")),
            ),
            MttRule::new("copy_e", "q", TreePattern::kind("e"), TreeTemplate::node("e")),
        ]);
        let tree = leaf("a")
            .with_child(leaf("a").with_child(leaf("e")).with_child(leaf("e")))
            .with_child(leaf("e"));

        let out = engine.transform("q", &tree, &[]).unwrap();
        assert_eq!(out, tree);
        assert_tree(&out).child_kinds(&["a", "e"]);
    }
}

mod self_boundary {
    use super::*;
    use pretty_assertions::assert_eq;

    fn guarded_on_self(pattern: TreePattern) -> MttEngine {
        program(vec![MttRule::new("needs_self", "q", pattern, TreeTemplate::node("seen"))
            .with_guard(Expression::binary(
                "==",
                Expression::var_prop("self", "kind_tag"),
                Expression::literal("e"),
            ))])
    }

    #[test]
    fn test_self_is_not_bound_implicitly() {
        let engine = guarded_on_self(TreePattern::kind("e"));
        let err = engine
            .transform("q", &leaf("e").with_attr("kind_tag", "e"), &[])
            .unwrap_err();
        assert!(matches!(err, RuleError::UnboundVariable { ref name } if name == "self"), "{}", err);
    }

    #[test]
    fn test_explicit_self_binding() {
        let tree = leaf("e").with_attr("kind_tag", "e");

        let by_bind = guarded_on_self(TreePattern::kind("e").bind("self"));
        assert_eq!(by_bind.transform("q", &tree, &[]).unwrap().kind, "seen");

        let by_variable = guarded_on_self(TreePattern::var("self"));
        assert_eq!(by_variable.transform("q", &tree, &[]).unwrap().kind, "seen");
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_unknown_state() {
        let engine = program(vec![]);
        let err = engine.transform("missing", &leaf("e"), &[]).unwrap_err();
        assert!(matches!(err, RuleError::UnknownState { ref state } if state == "missing"));
    }

    #[test]
    fn test_unbound_template_variable() {
        let engine = program(vec![MttRule::new(
            "bad",
            "q",
            TreePattern::kind("e"),
            TreeTemplate::node("out").with_child(TreeTemplate::var("ghost")),
        )]);
        let err = engine.transform("q", &leaf("e"), &[]).unwrap_err();
        assert!(matches!(err, RuleError::UnboundVariable { .. }));
    }

    #[test]
    fn test_unsupported_constructs_from_yaml() {
        let yaml = r#"
initialState: q
rules:
  - name: odd
    state: q
    inputPattern: { type: kind_pattern, kind: e }
    outputTemplate: { type: hologram }
"#;
        let engine = MttEngine::new(MttProgram::from_yaml_str(yaml).unwrap());
        let err = engine.transform("q", &leaf("e"), &[]).unwrap_err();
        assert!(matches!(err, RuleError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_self_recursion_is_bounded() {
        let engine = program(vec![MttRule::new(
            "loop",
            "q",
            TreePattern::var("x"),
            TreeTemplate::node("again").with_child(TreeTemplate::var("x")),
        )]);
        let err = engine.transform("q", &leaf("e"), &[]).unwrap_err();
        assert!(matches!(err, RuleError::MaxDepthExceeded { depth: 256 }));
    }
}

mod long_inputs {
    use super::*;
    use pretty_assertions::assert_eq;

    fn counter() -> MttEngine {
        program(vec![
            MttRule::new(
                "step",
                "q",
                TreePattern::kind("list").with_children([TreePattern::wildcard(), TreePattern::var("tail")]),
                TreeTemplate::call(
                    "q",
                    "tail",
                    vec![Expression::binary("+", Expression::var("n"), Expression::literal(1i64))],
                ),
            )
            .with_parameters(["n"]),
            MttRule::new(
                "done",
                "q",
                TreePattern::kind("nil"),
                TreeTemplate::node("count").with_attr("n", Expression::var("n")),
            )
            .with_parameters(["n"]),
        ])
    }

    #[test]
    fn test_fold_longer_than_depth_bound() {
        let list = TreeNode::cons_list((0..1500).map(|i| leaf("item").with_attr("i", i as i64)));
        let out = counter().transform("q", &list, &[Value::Int(0)]).unwrap();
        assert_eq!(out.attr("n"), Some(&Value::Int(1500)));
    }

    #[test]
    fn test_deep_right_spine_walk() {
        // s(x, rest) -> q(rest): walk to the bottom of a 1500 deep spine.
        let engine = program(vec![
            MttRule::new(
                "descend",
                "q",
                TreePattern::kind("s").with_children([TreePattern::wildcard(), TreePattern::var("rest")]),
                TreeTemplate::var("rest"),
            ),
            MttRule::new(
                "bottom",
                "q",
                TreePattern::kind("end").bind("end"),
                TreeTemplate::node("reached").with_attr("depth", Expression::var_prop("end", "depth")),
            ),
        ]);
        let mut tree = leaf("end").with_attr("depth", 1500i64);
        for _ in 0..1500 {
            tree = TreeNode::new("s").with_child(leaf("x")).with_child(tree);
        }

        let out = engine.transform("q", &tree, &[]).unwrap();
        assert_eq!(out, leaf("reached").with_attr("depth", 1500i64));
    }

    #[test]
    fn test_nested_rebuild_within_bound() {
        // Rebuilding non-tail still nests one frame per level.
        let engine = program(vec![MttRule::new(
            "copy",
            "q",
            TreePattern::kind("s").with_children([TreePattern::var("rest")]),
            TreeTemplate::node("t").with_child(TreeTemplate::var("rest")),
        )]);
        let mut tree = leaf("end");
        for _ in 0..200 {
            tree = TreeNode::new("s").with_child(tree);
        }

        let out = engine.transform("q", &tree, &[]).unwrap();
        let mut depth = 0;
        let mut node = &out;
        while let Some(child) = node.children.first() {
            assert_eq!(node.kind, "t");
            node = child;
            depth += 1;
        }
        assert_eq!(depth, 200);
        assert_eq!(node.kind, "end");
    }
}
