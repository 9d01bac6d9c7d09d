//! End-to-end duplication scenarios over realistic object graphs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use graph_clone::{
    deep_clone, deep_clone_with, reflect_record, shallow_clone, CloneError, CloneSettings,
    CloneSettingsBuilder, Polymorphic, Shared,
};

#[derive(Clone, Debug, Default)]
struct Inner {
    x: u32,
}

reflect_record! {
    Inner {
        x: u32,
    }
}

#[derive(Clone, Debug, Default)]
struct Doc {
    a: u32,
    b: Shared<Inner>,
    c: Shared<Inner>,
}

reflect_record! {
    Doc {
        a: u32,
        b: Shared<Inner>,
        c: Shared<Inner>,
    }
}

#[test]
fn sharing_is_preserved_within_one_operation() {
    let inner = Shared::new(Inner { x: 5 });
    let source = Doc {
        a: 100,
        b: inner.clone(),
        c: inner,
    };

    let clone = deep_clone(&source).unwrap();

    assert_eq!(clone.a, 100);
    assert_eq!(clone.b.borrow().x, 5);
    // Both handles share one fresh cell, distinct from the source's.
    assert!(Shared::ptr_eq(&clone.b, &clone.c));
    assert!(!Shared::ptr_eq(&clone.b, &source.b));

    clone.b.borrow_mut().x = 9;
    assert_eq!(clone.c.borrow().x, 9);
    assert_eq!(source.b.borrow().x, 5);
}

#[test]
fn separate_operations_produce_independent_clones() {
    let inner = Shared::new(Inner { x: 1 });
    let source = Doc {
        a: 0,
        b: inner.clone(),
        c: inner,
    };

    let first = deep_clone(&source).unwrap();
    let second = deep_clone(&source).unwrap();
    assert!(!Shared::ptr_eq(&first.b, &second.b));
}

#[derive(Clone, Debug, Default)]
struct Node {
    value: u32,
    next: Option<Shared<Node>>,
}

reflect_record! {
    Node {
        value: u32,
        next: Option<Shared<Node>>,
    }
}

#[test]
fn self_referential_cycle_terminates() {
    let node = Shared::new(Node {
        value: 1,
        next: None,
    });
    node.borrow_mut().next = Some(node.clone());

    let clone = deep_clone(&node).unwrap();

    assert_eq!(clone.borrow().value, 1);
    let next = clone.borrow().next.clone().unwrap();
    assert!(Shared::ptr_eq(&next, &clone));
    assert!(!Shared::ptr_eq(&next, &node));
}

#[test]
fn two_node_cycle_terminates() {
    let first = Shared::new(Node {
        value: 1,
        next: None,
    });
    let second = Shared::new(Node {
        value: 2,
        next: Some(first.clone()),
    });
    first.borrow_mut().next = Some(second.clone());

    let clone = deep_clone(&first).unwrap();

    let cloned_second = clone.borrow().next.clone().unwrap();
    assert_eq!(cloned_second.borrow().value, 2);
    let back = cloned_second.borrow().next.clone().unwrap();
    assert!(Shared::ptr_eq(&back, &clone));
    assert!(!Shared::ptr_eq(&cloned_second, &second));
}

#[test]
fn shallow_clone_shares_interior_state() {
    let inner = Shared::new(Inner { x: 3 });
    let source = Doc {
        a: 1,
        b: inner.clone(),
        c: inner,
    };

    let shallow = shallow_clone(&source).unwrap();
    assert!(Shared::ptr_eq(&shallow.b, &source.b));

    shallow.b.borrow_mut().x = 8;
    assert_eq!(source.b.borrow().x, 8);

    let deep = deep_clone(&source).unwrap();
    assert!(!Shared::ptr_eq(&deep.b, &source.b));
}

#[derive(Clone, Default)]
struct WithScratch {
    kept: String,
    scratch: Vec<u8>,
}

reflect_record! {
    WithScratch {
        kept: String,
        #[clone_ignore]
        scratch: Vec<u8>,
    }
}

#[test]
fn marked_member_keeps_its_default() {
    let source = WithScratch {
        kept: String::from("yes"),
        scratch: vec![1, 2, 3],
    };
    let clone = deep_clone(&source).unwrap();
    assert_eq!(clone.kept, "yes");
    assert_eq!(clone.scratch, Vec::<u8>::new());
}

#[test]
fn inclusion_predicate_cannot_resurrect_a_marked_member() {
    let settings = CloneSettingsBuilder::new()
        .member_predicate(Arc::new(|_| true))
        .build();
    let source = WithScratch {
        kept: String::from("yes"),
        scratch: vec![9],
    };
    let clone = deep_clone_with(&source, &settings).unwrap();
    assert_eq!(clone.scratch, Vec::<u8>::new());
}

#[test]
fn inclusion_predicate_excludes_members_by_name() {
    let settings = CloneSettingsBuilder::new()
        .member_predicate(Arc::new(|member| member.name != "kept"))
        .build();
    let source = WithScratch {
        kept: String::from("dropped"),
        scratch: vec![],
    };
    let clone = deep_clone_with(&source, &settings).unwrap();
    assert_eq!(clone.kept, "");
}

static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Default)]
struct Cached {
    items: Vec<u64>,
    total: u64,
}

impl Cached {
    fn recompute(&mut self, source: &Cached, _settings: &CloneSettings) {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
        // Members are already populated when the hook runs.
        self.total = self.items.iter().sum();
        assert_eq!(self.items, source.items);
    }
}

reflect_record! {
    Cached {
        items: Vec<u64>,
        total: u64,
    }
    post_clone = Cached::recompute;
}

#[test]
fn hook_runs_once_after_members_are_populated() {
    let source = Cached {
        items: vec![2, 3, 5],
        total: 0,
    };
    let before = HOOK_CALLS.load(Ordering::SeqCst);
    let clone = deep_clone(&source).unwrap();
    assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), before + 1);
    assert_eq!(clone.total, 10);
    assert_eq!(source.total, 0);
}

#[test]
fn recursion_limit_surfaces_as_an_error() {
    let settings = CloneSettingsBuilder::new().max_depth(4).build();

    let mut head = Shared::new(Node {
        value: 0,
        next: None,
    });
    for value in 1..32 {
        head = Shared::new(Node {
            value,
            next: Some(head),
        });
    }

    let err = deep_clone_with(&head, &settings).unwrap_err();
    assert!(matches!(err, CloneError::RecursionLimit { limit: 4, .. }));
}

#[test]
fn denied_constructor_fails_the_whole_operation() {
    let settings = CloneSettingsBuilder::new()
        .constructor_resolver(Arc::new(|info| {
            Err(CloneError::construction(info.name(), "denied by policy"))
        }))
        .build();

    let source = Doc::default();
    let err = deep_clone_with(&source, &settings).unwrap_err();
    assert!(matches!(err, CloneError::Construction { .. }));
}

#[derive(Clone)]
struct Widget {
    label: String,
    payload: Box<dyn Polymorphic>,
}

reflect_record! {
    Widget {
        label: String,
        payload: Box<dyn Polymorphic>,
    }
    constructor = || Widget {
        label: String::new(),
        payload: Box::new(0u64),
    };
}

#[test]
fn polymorphic_member_clones_as_its_concrete_type() {
    let source = Widget {
        label: String::from("w"),
        payload: Box::new(vec![String::from("deep")]),
    };

    let clone = deep_clone(&source).unwrap();
    assert_eq!(clone.label, "w");
    let payload = clone
        .payload
        .as_ref()
        .as_reflect()
        .downcast_ref::<Vec<String>>()
        .unwrap();
    assert_eq!(payload, &vec![String::from("deep")]);
}

#[test]
fn nested_trait_objects_clone_to_the_innermost_value() {
    let mut source: Box<dyn Polymorphic> = Box::new(String::from("core"));
    for _ in 0..3 {
        source = Box::new(source);
    }

    let clone = deep_clone(&source).unwrap();
    let mut layer: &dyn Polymorphic = clone.as_ref();
    for _ in 0..3 {
        layer = layer
            .as_reflect()
            .downcast_ref::<Box<dyn Polymorphic>>()
            .unwrap()
            .as_ref();
    }
    assert_eq!(
        layer.as_reflect().downcast_ref::<String>().map(String::as_str),
        Some("core")
    );
}

#[test]
fn delegation_frames_count_toward_the_depth_limit() {
    let settings = CloneSettingsBuilder::new().max_depth(8).build();

    let mut value: Box<dyn Polymorphic> = Box::new(0u32);
    for _ in 0..64 {
        value = Box::new(value);
    }

    let err = deep_clone_with(&value, &settings).err().unwrap();
    assert!(matches!(err, CloneError::RecursionLimit { .. }));
}

#[test]
fn widened_primitive_predicate_turns_handles_into_aliases() {
    // Classifying every type as primitive collapses deep cloning into
    // assignment, so shared cells come back shared with the source.
    let settings = CloneSettingsBuilder::new()
        .primitive_predicate(Arc::new(|_| true))
        .build();

    let inner = Shared::new(Inner { x: 2 });
    let source = Doc {
        a: 4,
        b: inner.clone(),
        c: inner,
    };

    let clone = deep_clone_with(&source, &settings).unwrap();
    assert!(Shared::ptr_eq(&clone.b, &source.b));
}

proptest! {
    #[test]
    fn primitive_collections_round_trip(values in proptest::collection::vec(any::<u32>(), 0..64)) {
        let clone = deep_clone(&values).unwrap();
        prop_assert_eq!(clone, values);
    }

    #[test]
    fn nested_optionals_round_trip(value in proptest::option::of(any::<String>())) {
        let wrapped = vec![value];
        let clone = deep_clone(&wrapped).unwrap();
        prop_assert_eq!(clone, wrapped);
    }
}
