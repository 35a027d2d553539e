/// Partitioning of lookup URLs into rate-limit sized groups and windows

/// URLs sent in a single batchGet call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestGroup {
    /// Position of the group across the whole plan
    pub index: usize,
    pub urls: Vec<String>,
}

/// Groups that fit in one rate window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWindow {
    pub index: usize,
    pub groups: Vec<RequestGroup>,
}

/// Ordered groups of a batch, windowed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchPlan {
    pub windows: Vec<RequestWindow>,
}

impl BatchPlan {
    /// Split `urls` into groups of at most `max_urls_per_group`, and those into windows of at
    /// most `max_groups_per_window`. Input order is preserved.
    pub fn new(urls: &[String], max_urls_per_group: usize, max_groups_per_window: usize) -> Self {
        let max_urls_per_group = max_urls_per_group.max(1);
        let max_groups_per_window = max_groups_per_window.max(1);

        let groups: Vec<RequestGroup> = urls
            .chunks(max_urls_per_group)
            .enumerate()
            .map(|(index, chunk)| RequestGroup {
                index,
                urls: chunk.to_vec(),
            })
            .collect();

        let mut windows = Vec::new();
        let mut remaining = groups.into_iter().peekable();
        while remaining.peek().is_some() {
            let groups: Vec<RequestGroup> = remaining.by_ref().take(max_groups_per_window).collect();
            windows.push(RequestWindow {
                index: windows.len(),
                groups,
            });
        }

        Self { windows }
    }

    pub fn group_count(&self) -> usize {
        self.windows.iter().map(|w| w.groups.len()).sum()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// All groups in order
    pub fn groups(&self) -> impl Iterator<Item = &RequestGroup> {
        self.windows.iter().flat_map(|w| w.groups.iter())
    }
}
