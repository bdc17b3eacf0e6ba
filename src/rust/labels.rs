/// Maps classifier label indices to the names shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelTable;

const LABELS: [(i64, &str); 5] = [
    (0, "False"),
    (1, "True"),
    (2, "Half True"),
    (3, "Mostly True"),
    (4, "Pants on Fire"),
];

impl LabelTable {
    /// Returns the display name for a known index
    pub fn get(&self, index: i64) -> Option<&'static str> {
        LABELS.iter().find(|(i, _)| *i == index).map(|(_, name)| *name)
    }

    /// Returns the display name, falling back to the index itself for unknown labels.
    pub fn display(&self, index: i64) -> String {
        self.get(index)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }

    pub fn entries(&self) -> impl Iterator<Item = (i64, &'static str)> {
        LABELS.iter().copied()
    }
}
