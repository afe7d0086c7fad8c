//! In-memory ordered task list
//!
//! The single source of truth for the displayed order during a session.
//! The list is rebuilt wholesale by [`TaskList::load`] after every fetch
//! and mutated incrementally by [`TaskList::apply_reorder`]; nothing
//! else touches it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::task::{Task, TaskId};

#[derive(Debug, Error, PartialEq)]
pub enum ListError {
    #[error("index {index} out of bounds for list of {len} tasks")]
    InvalidIndex { index: usize, len: usize },
}

/// One entry of the bulk positional update sent to the remote store
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: TaskId,
    pub order: u32,
}

/// Ordered collection of tasks, sorted by `order` ascending
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entire list, sorting by `order` ascending
    pub fn load(&mut self, mut tasks: Vec<Task>) {
        tasks.sort_by_key(|t| t.order);
        self.tasks = tasks;
    }

    /// Read-only view of the current ordered sequence
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Zero-based position of a task by id
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Moves the task at `source` to `target` and renumbers densely
    ///
    /// Splice semantics: the element is removed (everything after it
    /// shifts up one slot) and reinserted at `target` in the shortened
    /// sequence, so exactly one task moves the full distance and the
    /// tasks strictly between the two positions shift by one. Every
    /// `order` is then recomputed as the 1-based position, which also
    /// repairs any gaps in previously loaded data.
    ///
    /// Returns the complete `{id, order}` mapping for persistence.
    /// Indices outside `[0, len)` are rejected without mutation.
    pub fn apply_reorder(
        &mut self,
        source: usize,
        target: usize,
    ) -> Result<Vec<OrderUpdate>, ListError> {
        let len = self.tasks.len();
        for index in [source, target] {
            if index >= len {
                return Err(ListError::InvalidIndex { index, len });
            }
        }

        let moved = self.tasks.remove(source);
        self.tasks.insert(target, moved);

        for (position, task) in self.tasks.iter_mut().enumerate() {
            task.order = (position + 1) as u32;
        }

        Ok(self.order_snapshot())
    }

    /// The current `{id, order}` mapping for every task
    pub fn order_snapshot(&self) -> Vec<OrderUpdate> {
        self.tasks
            .iter()
            .map(|t| OrderUpdate {
                id: t.id,
                order: t.order,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn task(id: u64, order: u32) -> Task {
        Task {
            id: TaskId::new(id),
            name: format!("Task {}", id),
            cost: 10.0,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            order,
        }
    }

    fn ids(list: &TaskList) -> Vec<u64> {
        list.tasks().iter().map(|t| t.id.raw()).collect()
    }

    fn orders(list: &TaskList) -> Vec<u32> {
        list.tasks().iter().map(|t| t.order).collect()
    }

    #[test]
    fn load_sorts_by_order() {
        let mut list = TaskList::new();
        list.load(vec![task(1, 9), task(2, 2), task(3, 5)]);
        assert_eq!(ids(&list), vec![2, 3, 1]);
    }

    #[test]
    fn reorder_moves_first_to_last() {
        // Scenario: [{id:1,order:1},{id:2,order:2},{id:3,order:3}] with
        // a move from index 0 to index 2.
        let mut list = TaskList::new();
        list.load(vec![task(1, 1), task(2, 2), task(3, 3)]);

        let updates = list.apply_reorder(0, 2).unwrap();

        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_eq!(orders(&list), vec![1, 2, 3]);
        assert_eq!(
            updates,
            vec![
                OrderUpdate { id: TaskId::new(2), order: 1 },
                OrderUpdate { id: TaskId::new(3), order: 2 },
                OrderUpdate { id: TaskId::new(1), order: 3 },
            ]
        );
    }

    #[test]
    fn reorder_is_a_single_move_not_a_swap() {
        let mut list = TaskList::new();
        list.load((1..=6).map(|i| task(i, i as u32)).collect());

        list.apply_reorder(1, 4).unwrap();

        // Task 2 moved the full distance; 3, 4, 5 each shifted one slot
        // toward the front; 1 and 6 are untouched.
        assert_eq!(ids(&list), vec![1, 3, 4, 5, 2, 6]);
    }

    #[test]
    fn reorder_toward_the_front() {
        let mut list = TaskList::new();
        list.load(vec![task(1, 1), task(2, 2), task(3, 3)]);

        list.apply_reorder(2, 0).unwrap();

        assert_eq!(ids(&list), vec![3, 1, 2]);
        assert_eq!(orders(&list), vec![1, 2, 3]);
    }

    #[test]
    fn same_index_reorder_is_identity() {
        let mut list = TaskList::new();
        list.load(vec![task(1, 1), task(2, 2), task(3, 3)]);
        let before = list.order_snapshot();

        let updates = list.apply_reorder(1, 1).unwrap();

        assert_eq!(list.order_snapshot(), before);
        assert_eq!(updates, before);
    }

    #[test]
    fn reorder_renumbers_gappy_orders() {
        // Server data with gaps settles into a dense 1..N after the
        // first reorder.
        let mut list = TaskList::new();
        list.load(vec![task(1, 3), task(2, 7), task(3, 20)]);

        list.apply_reorder(0, 0).unwrap();

        assert_eq!(orders(&list), vec![1, 2, 3]);
    }

    #[test]
    fn out_of_bounds_indices_are_rejected_without_mutation() {
        let mut list = TaskList::new();
        list.load(vec![task(1, 1), task(2, 2)]);
        let before = ids(&list);

        assert_eq!(
            list.apply_reorder(2, 0),
            Err(ListError::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            list.apply_reorder(0, 5),
            Err(ListError::InvalidIndex { index: 5, len: 2 })
        );
        assert_eq!(ids(&list), before);
    }

    #[test]
    fn empty_list_rejects_any_reorder() {
        let mut list = TaskList::new();
        assert_eq!(
            list.apply_reorder(0, 0),
            Err(ListError::InvalidIndex { index: 0, len: 0 })
        );
    }

    #[test]
    fn position_of_finds_tasks() {
        let mut list = TaskList::new();
        list.load(vec![task(5, 1), task(9, 2)]);
        assert_eq!(list.position_of(TaskId::new(9)), Some(1));
        assert_eq!(list.position_of(TaskId::new(1)), None);
    }

    proptest! {
        /// After any sequence of reorders the order set is exactly
        /// {1..N}, the id set is preserved, and each step matches a
        /// plain remove/insert model.
        #[test]
        fn orders_stay_dense_under_arbitrary_reorders(
            len in 1usize..12,
            moves in prop::collection::vec((0usize..12, 0usize..12), 0..24),
        ) {
            let mut list = TaskList::new();
            list.load((1..=len as u64).map(|i| task(i, i as u32)).collect());
            let mut model: Vec<u64> = (1..=len as u64).collect();

            for (s, t) in moves {
                let (s, t) = (s % len, t % len);
                list.apply_reorder(s, t).unwrap();
                let moved = model.remove(s);
                model.insert(t, moved);

                prop_assert_eq!(&ids(&list), &model);
                let expected: Vec<u32> = (1..=len as u32).collect();
                prop_assert_eq!(orders(&list), expected);
            }
        }
    }
}
