pub mod component;
pub mod handlekeyseq;
pub mod handlequery;
pub mod handleraw;
pub mod handlesession;
pub mod ontick;
pub mod renderable;
