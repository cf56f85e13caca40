/// A host split into labels, with suffix slices borrowed from the host.
#[derive(Debug)]
pub(super) struct HostLabels<'h> {
    host: &'h str,
    /// Labels in reading order
    labels: Vec<&'h str>,
    /// Byte offset of each label in `host`
    starts: Vec<usize>,
}

impl<'h> HostLabels<'h> {
    /// Split `host` on dots. Returns `None` for an empty host or empty labels.
    pub fn new(host: &'h str) -> Option<Self> {
        if host.is_empty() {
            return None;
        }

        let mut labels = Vec::new();
        let mut starts = Vec::new();
        let mut pos = 0;
        for label in host.split('.') {
            if label.is_empty() {
                return None;
            }
            labels.push(label);
            starts.push(pos);
            pos += label.len() + 1;
        }

        Some(Self {
            host,
            labels,
            starts,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn as_slice(&self) -> &[&'h str] {
        &self.labels
    }

    /// The last `count` labels joined with dots. `count` must be in `1..=len()`.
    pub fn suffix(&self, count: usize) -> &'h str {
        &self.host[self.starts[self.len() - count]..]
    }

    /// Labels in root-first order
    pub fn root_first(&self) -> Vec<&'h str> {
        self.labels.iter().rev().copied().collect()
    }
}
