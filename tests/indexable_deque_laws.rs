//! Property-based tests for IndexableDeque laws.
//!
//! Random operation sequences are applied to an `IndexableDeque` and to a
//! `VecDeque` model side by side; after every step both must hold the same
//! elements and the deque's buffer invariants must hold.

use indexable_deque::IndexableDeque;
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Operation {
    PushFront(i16),
    PushBack(i16),
    PopFront,
    PopBack,
    Insert(usize, i16),
    RemoveAt(usize),
    Set(usize, i16),
    InsertAll(usize, Vec<i16>),
    RemoveWhere(i16),
    Sort,
    Trim,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => any::<i16>().prop_map(Operation::PushFront),
        3 => any::<i16>().prop_map(Operation::PushBack),
        2 => Just(Operation::PopFront),
        2 => Just(Operation::PopBack),
        2 => (any::<usize>(), any::<i16>()).prop_map(|(index, value)| Operation::Insert(index, value)),
        2 => any::<usize>().prop_map(Operation::RemoveAt),
        1 => (any::<usize>(), any::<i16>()).prop_map(|(index, value)| Operation::Set(index, value)),
        1 => (any::<usize>(), prop::collection::vec(any::<i16>(), 0..8))
            .prop_map(|(index, values)| Operation::InsertAll(index, values)),
        1 => (2_i16..6).prop_map(Operation::RemoveWhere),
        1 => Just(Operation::Sort),
        1 => Just(Operation::Trim),
    ]
}

fn apply(deque: &mut IndexableDeque<i16>, model: &mut VecDeque<i16>, operation: Operation) {
    match operation {
        Operation::PushFront(value) => {
            deque.push_front(value);
            model.push_front(value);
        }
        Operation::PushBack(value) => {
            deque.push_back(value);
            model.push_back(value);
        }
        Operation::PopFront => assert_eq!(deque.pop_front(), model.pop_front()),
        Operation::PopBack => assert_eq!(deque.pop_back(), model.pop_back()),
        Operation::Insert(index, value) => {
            let index = index % (model.len() + 1);
            deque.insert(index, value).unwrap();
            model.insert(index, value);
        }
        Operation::RemoveAt(index) => {
            if !model.is_empty() {
                let index = index % model.len();
                assert_eq!(deque.remove_at(index).ok(), model.remove(index));
            }
        }
        Operation::Set(index, value) => {
            if !model.is_empty() {
                let index = index % model.len();
                let previous = std::mem::replace(&mut model[index], value);
                assert_eq!(deque.set(index, value), Ok(previous));
            }
        }
        Operation::InsertAll(index, values) => {
            let index = index % (model.len() + 1);
            let changed = !values.is_empty();
            for (offset, value) in values.iter().enumerate() {
                model.insert(index + offset, *value);
            }
            assert_eq!(deque.insert_all(index, values), Ok(changed));
        }
        Operation::RemoveWhere(divisor) => {
            let before = model.len();
            model.retain(|value| value % divisor != 0);
            assert_eq!(deque.remove_where(|value| value % divisor == 0), model.len() != before);
        }
        Operation::Sort => {
            deque.sort();
            model.make_contiguous().sort();
        }
        Operation::Trim => {
            deque.trim_to_size();
            assert_eq!(deque.capacity(), model.len());
        }
    }
}

proptest! {
    /// Model Law: every operation agrees with VecDeque
    #[test]
    fn prop_agrees_with_vec_deque(
        capacity in 0_usize..10,
        operations in prop::collection::vec(operation(), 0..120)
    ) {
        let mut deque = IndexableDeque::with_capacity(capacity);
        let mut model = VecDeque::new();
        for operation in operations {
            apply(&mut deque, &mut model, operation);
            prop_assert!(deque.invariants_hold());
            prop_assert_eq!(deque.len(), model.len());
            prop_assert!(deque.len() <= deque.capacity());
            prop_assert_eq!(&deque, &model);
        }
    }

    /// Round-trip Law: collecting and listing preserves the sequence
    #[test]
    fn prop_round_trip(elements in prop::collection::vec(any::<i32>(), 0..100)) {
        let deque: IndexableDeque<i32> = elements.iter().copied().collect();
        prop_assert_eq!(deque.to_list(), elements);
    }

    /// Trim Idempotence Law: a second trim leaves the capacity unchanged
    #[test]
    fn prop_trim_idempotent(
        elements in prop::collection::vec(any::<i32>(), 0..60),
        rotation in 0_usize..60
    ) {
        let mut deque = IndexableDeque::with_capacity(64);
        for _ in 0..rotation {
            deque.push_back(0);
            deque.pop_front();
        }
        deque.extend(elements.iter().copied());
        deque.trim_to_size();
        let first = deque.capacity();
        deque.trim_to_size();
        prop_assert_eq!(deque.capacity(), first);
        prop_assert_eq!(deque.to_vec(), elements);
    }

    /// Stability Law: sorting by key keeps equal keys in insertion order
    #[test]
    fn prop_sort_is_stable(
        keys in prop::collection::vec(0_u8..4, 0..60),
        rotation in 0_usize..70
    ) {
        let mut deque = IndexableDeque::with_capacity(keys.len() + 1);
        for _ in 0..rotation {
            deque.push_back((0, 0));
            deque.pop_front();
        }
        deque.extend(keys.iter().copied().enumerate().map(|(seq, key)| (key, seq)));

        let mut expected = deque.to_vec();
        expected.sort_by_key(|&(key, _)| key);
        deque.sort_by_key(|&(key, _)| key);
        prop_assert_eq!(deque.to_vec(), expected);
        prop_assert!(deque.invariants_hold());
    }

    /// Hash Law: equal sequences hash equally whatever their layout
    #[test]
    fn prop_equal_sequences_hash_equally(
        elements in prop::collection::vec(any::<i32>(), 0..40),
        rotation in 0_usize..40
    ) {
        let straight: IndexableDeque<i32> = elements.iter().copied().collect();
        let mut rotated = IndexableDeque::with_capacity(elements.len() + 1);
        for _ in 0..rotation {
            rotated.push_back(0);
            rotated.pop_front();
        }
        rotated.extend(elements.iter().copied());

        prop_assert_eq!(&straight, &rotated);
        prop_assert_eq!(straight.sequence_hash(), rotated.sequence_hash());
    }
}
