//! Reveal/dive: the hero backdrop and the fullscreen exploration mode.

mod hero;
mod machine;
mod panel;

pub use hero::HeroSection;
pub use machine::{
	DiveMachine, GENERATED_MESSAGE, GenerationStatus, GenerationTicket, Mode, NodePanel,
	PageScroll, PanelAction, ScrollLock,
};
pub use panel::NodeActionPanel;
