use crate::task::{Priority, Status, Task};

/// The active filter key controlling which tasks are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    #[default]
    All,
    Todo,
    InProgress,
    Done,
    High,
    Medium,
    Low,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::All,
        Criterion::Todo,
        Criterion::InProgress,
        Criterion::Done,
        Criterion::High,
        Criterion::Medium,
        Criterion::Low,
    ];

    /// Parses a filter key. Unknown keys fall back to showing everything.
    pub fn from_key(key: &str) -> Self {
        match key {
            "todo" => Criterion::Todo,
            "inProgress" => Criterion::InProgress,
            "done" => Criterion::Done,
            "high" => Criterion::High,
            "medium" => Criterion::Medium,
            "low" => Criterion::Low,
            _ => Criterion::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::All => "All",
            Criterion::Todo => "To do",
            Criterion::InProgress => "In progress",
            Criterion::Done => "Done",
            Criterion::High => "High",
            Criterion::Medium => "Medium",
            Criterion::Low => "Low",
        }
    }
}

/// Selects the visible subset of `tasks`, preserving insertion order.
pub fn select(tasks: &[Task], criterion: Criterion) -> Vec<&Task> {
    let matches = |t: &Task| match criterion {
        Criterion::All => true,
        Criterion::Todo => t.status == Status::Todo,
        Criterion::InProgress => t.status == Status::InProgress,
        Criterion::Done => t.status == Status::Done,
        Criterion::High => t.priority == Priority::High,
        Criterion::Medium => t.priority == Priority::Medium,
        Criterion::Low => t.priority == Priority::Low,
    };
    tasks.iter().filter(|t| matches(t)).collect()
}
