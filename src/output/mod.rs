// Output formatting — terminal display of topics and training runs.

pub mod terminal;
