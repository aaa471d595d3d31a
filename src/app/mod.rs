// Application layer: wires configuration, adapters and the valuation core together.

pub mod bootstrap;
