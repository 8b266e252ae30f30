use serde::{Deserialize, Serialize};

/// Whether a trial slot presents a scored image set or a neutral filler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialKind {
    Image,
    Filler,
}

/// Opaque handle to an assigned stimulus (image set). The sequencer never
/// interprets it; only the rendering collaborator resolves it to pixels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusRef(String);

impl StimulusRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

/// One position in the trial plan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialSlot {
    pub kind: TrialKind,
    pub stimulus: StimulusRef,
}

/// Ordered sequence of trial slots, generated once before a session starts
/// and immutable thereafter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialPlan {
    slots: Vec<TrialSlot>,
}

impl TrialPlan {
    pub fn new(slots: Vec<TrialSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrialSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrialSlot> {
        self.slots.iter()
    }

    pub fn image_count(&self) -> usize {
        self.count(TrialKind::Image)
    }

    pub fn filler_count(&self) -> usize {
        self.count(TrialKind::Filler)
    }

    fn count(&self, kind: TrialKind) -> usize {
        self.slots.iter().filter(|s| s.kind == kind).count()
    }
}
