use std::sync::Arc;

use crate::state::{ShaderDefines, StateFragment};

/// Selects a pipeline: the pipeline-relevant state plus the shader variant
/// it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineBinding {
    pub state: Arc<StateFragment>,
    pub defines: ShaderDefines,
}

impl PipelineBinding {
    #[must_use]
    pub fn new(state: Arc<StateFragment>) -> Self {
        let defines = ShaderDefines::from_pipeline_state(&state);
        Self { state, defines }
    }
}

/// Binds data state (textures, material constants, uniforms) without
/// changing the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorBinding {
    pub state: Arc<StateFragment>,
}

/// A state command recorded on a [`RenderNode::StateGroup`](super::RenderNode::StateGroup).
#[derive(Debug, Clone, PartialEq)]
pub enum StateCommand {
    BindPipeline(PipelineBinding),
    BindDescriptors(DescriptorBinding),
}

impl StateCommand {
    /// The fragment the command binds.
    #[must_use]
    pub fn state(&self) -> &Arc<StateFragment> {
        match self {
            Self::BindPipeline(p) => &p.state,
            Self::BindDescriptors(d) => &d.state,
        }
    }

    #[must_use]
    pub fn is_pipeline(&self) -> bool {
        matches!(self, Self::BindPipeline(_))
    }
}
