use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::TestCaseResult;
use std::cell::RefCell;
use std::rc::Rc;
use tasklist::{Filter, TaskListStore, fixtures};

const DEFAULT_STORE_PROPTEST_CASES: u32 = 256;

fn store_proptest_cases() -> u32 {
    std::env::var("TASKLIST_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_STORE_PROPTEST_CASES)
}

#[derive(Clone, Debug)]
enum StoreAction {
    Add(String),
    Remove(usize),
    Toggle(usize),
    RemoveUnknown,
    SetAll(bool),
    ClearCompleted,
}

fn title_strategy() -> BoxedStrategy<String> {
    vec(
        prop_oneof![Just('a'), Just('b'), Just('z'), Just('1'), Just(' '), Just('\t'), Just('-')],
        0..=8,
    )
    .prop_map(|chars| chars.into_iter().collect())
    .boxed()
}

fn store_action_strategy() -> BoxedStrategy<StoreAction> {
    prop_oneof![
        5 => title_strategy().prop_map(StoreAction::Add),
        2 => any::<usize>().prop_map(StoreAction::Remove),
        3 => any::<usize>().prop_map(StoreAction::Toggle),
        1 => Just(StoreAction::RemoveUnknown),
        1 => any::<bool>().prop_map(StoreAction::SetAll),
        1 => Just(StoreAction::ClearCompleted),
    ]
    .boxed()
}

fn pick_id(store: &TaskListStore, index: usize) -> Option<String> {
    let tasks = store.tasks();
    if tasks.is_empty() {
        return None;
    }
    Some(tasks[index % tasks.len()].id.clone())
}

fn assert_invariants(store: &TaskListStore) -> TestCaseResult {
    let counts = store.counts();
    let active = store.filtered_view(Filter::Active).len();
    let completed = store.filtered_view(Filter::Completed).len();

    prop_assert_eq!(active + completed, counts.total);
    prop_assert_eq!(completed, counts.completed);
    prop_assert_eq!(store.filtered_view(Filter::All).len(), counts.total);

    let mut ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    prop_assert_eq!(ids.len(), counts.total, "task ids must stay unique");

    for task in store.tasks() {
        prop_assert!(!task.title.trim().is_empty());
        prop_assert_eq!(task.title.trim(), task.title.as_str());
    }

    for filter in Filter::ALL {
        let view = store.filtered_view(filter);
        let expected: Vec<&str> = store
            .tasks()
            .iter()
            .filter(|t| filter.matches(t))
            .map(|t| t.id.as_str())
            .collect();
        let actual: Vec<&str> = view.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(actual, expected, "view order must follow store order");
    }

    Ok(())
}

fn apply(store: &mut TaskListStore, action: &StoreAction) -> TestCaseResult {
    let before = store.counts();

    match action {
        StoreAction::Add(title) => {
            let added = store.add(title);
            if title.trim().is_empty() {
                prop_assert!(added.is_none());
                prop_assert_eq!(store.counts(), before);
            } else {
                let added = added.expect("non-blank title adds a task");
                prop_assert_eq!(&store.tasks()[0].id, &added.id);
                prop_assert_eq!(store.counts().total, before.total + 1);
                prop_assert_eq!(store.counts().completed, before.completed);
            }
        }
        StoreAction::Remove(index) => {
            if let Some(id) = pick_id(store, *index) {
                let was_completed = store.get(&id).map(|t| t.completed).unwrap_or(false);
                prop_assert!(store.remove(&id));
                prop_assert!(!store.remove(&id));
                prop_assert_eq!(store.counts().total, before.total - 1);
                let expected_completed = before.completed - usize::from(was_completed);
                prop_assert_eq!(store.counts().completed, expected_completed);
            }
        }
        StoreAction::Toggle(index) => {
            if let Some(id) = pick_id(store, *index) {
                let original = store.get(&id).map(|t| t.completed);
                store.toggle(&id);
                store.toggle(&id);
                prop_assert_eq!(store.get(&id).map(|t| t.completed), original);
                store.toggle(&id);
                prop_assert_eq!(store.counts().total, before.total);
                prop_assert_eq!(store.counts().completed.abs_diff(before.completed), 1);
            }
        }
        StoreAction::RemoveUnknown => {
            prop_assert!(!store.remove("no-such-task"));
            prop_assert_eq!(store.toggle("no-such-task"), None);
            prop_assert_eq!(store.counts(), before);
        }
        StoreAction::SetAll(completed) => {
            store.set_all(*completed);
            let expected = if *completed { before.total } else { 0 };
            prop_assert_eq!(store.counts().completed, expected);
        }
        StoreAction::ClearCompleted => {
            let survivors: Vec<String> = store.view(Filter::Active).map(|t| t.id.clone()).collect();
            prop_assert_eq!(store.clear_completed(), before.completed);
            prop_assert_eq!(store.counts().total, before.total - before.completed);
            let remaining: Vec<String> = store.tasks().iter().map(|t| t.id.clone()).collect();
            prop_assert_eq!(remaining, survivors);
            prop_assert_eq!(store.clear_completed(), 0);
        }
    }

    assert_invariants(store)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: store_proptest_cases(),
        .. ProptestConfig::default()
    })]

    #[test]
    fn store_invariants_hold_for_any_action_sequence(
        actions in vec(store_action_strategy(), 1..=32),
        seed_demo in any::<bool>(),
    ) {
        let mut store = if seed_demo {
            TaskListStore::with_tasks(fixtures::demo_tasks())
        } else {
            TaskListStore::new()
        };
        assert_invariants(&store)?;

        for action in &actions {
            apply(&mut store, action)?;
        }
    }

    #[test]
    fn non_blank_adds_are_counted_newest_first(titles in vec("[a-z]{1,6}", 1..=16)) {
        let mut store = TaskListStore::new();
        for title in &titles {
            store.add(title);
        }

        prop_assert_eq!(store.counts().total, titles.len());
        let expected: Vec<&str> = titles.iter().rev().map(String::as_str).collect();
        let actual: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn each_effective_mutation_notifies_once(actions in vec(store_action_strategy(), 1..=24)) {
        let mut store = TaskListStore::with_tasks(fixtures::demo_tasks());
        let notifications = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&notifications);
        store.subscribe(move |_, _| *sink.borrow_mut() += 1);

        for action in &actions {
            let before = *notifications.borrow();
            let effective = match action {
                StoreAction::Add(title) => usize::from(store.add(title).is_some()),
                StoreAction::Remove(index) => match pick_id(&store, *index) {
                    Some(id) => usize::from(store.remove(&id)),
                    None => 0,
                },
                StoreAction::Toggle(index) => match pick_id(&store, *index) {
                    Some(id) => usize::from(store.toggle(&id).is_some()),
                    None => 0,
                },
                StoreAction::RemoveUnknown => usize::from(store.remove("no-such-task")),
                StoreAction::SetAll(completed) => usize::from(store.set_all(*completed) > 0),
                StoreAction::ClearCompleted => usize::from(store.clear_completed() > 0),
            };
            prop_assert_eq!(*notifications.borrow() - before, effective);
        }
    }
}

#[test]
fn seeded_scenario_matches_walkthrough() {
    let mut store = TaskListStore::with_tasks(fixtures::demo_tasks());
    assert_eq!((store.counts().total, store.counts().completed), (3, 1));

    store.add("new task");
    assert_eq!((store.counts().total, store.counts().completed), (4, 1));
    assert_eq!(store.filtered_view(Filter::All)[0].title, "new task");

    store.clear_completed();
    assert_eq!((store.counts().total, store.counts().completed), (3, 0));
    assert!(store.filtered_view(Filter::All).iter().all(|t| t.id != "2"));
}
