//! The reference Rankine plant as a network.
//!
//! ```text
//!            0                    1
//!   steam ──────▶ cycle closer ──────▶ steam turbine
//!   generator                              │ 2
//!      ▲ 4                                 ▼
//!   feed pump ◀────────────────── main condenser ◀── 11 ── cooling water source
//!                        3                 │ 12
//!                                          ▼
//!                                  cooling water sink
//! ```

use std::sync::Arc;

use rk_components::{Condenser, CycleCloser, Pump, SimpleHeatExchanger, Sink, Source, Turbine};
use rk_core::{ConnId, UnitSystem};
use rk_fluids::IncompressibleLiquid;
use rk_graph::{ConnAttrs, DofLedger, Network, PortRef};

use crate::config::{CoolingModel, RankineConfig};
use crate::error::{AppError, AppResult};

pub const CYCLE_CLOSER: &str = "cycle closer";
pub const STEAM_GENERATOR: &str = "steam generator";
pub const CONDENSER: &str = "main condenser";
pub const TURBINE: &str = "steam turbine";
pub const FEED_PUMP: &str = "feed pump";
pub const CW_SOURCE: &str = "cooling water source";
pub const CW_SINK: &str = "cooling water sink";

/// Connection labels.
pub mod labels {
    pub const BOILER_OUTLET: &str = "0";
    pub const LIVE_STEAM: &str = "1";
    pub const TURBINE_EXHAUST: &str = "2";
    pub const CONDENSATE: &str = "3";
    pub const FEED_WATER: &str = "4";
    pub const CW_INLET: &str = "11";
    pub const CW_OUTLET: &str = "12";
}

/// Build and specify the plant for `config`.
///
/// The configuration is validated first; nothing is built for an invalid
/// one.
pub fn build_network(config: &RankineConfig) -> AppResult<Network> {
    config.validate()?;

    let mut net = Network::new();
    let closer = net.add_component(CycleCloser::new(CYCLE_CLOSER))?;
    let boiler = net.add_component(SimpleHeatExchanger::new(STEAM_GENERATOR))?;
    let condenser = net.add_component(Condenser::new(CONDENSER))?;
    let turbine = net.add_component(Turbine::new(TURBINE))?;
    let pump = net.add_component(Pump::new(FEED_PUMP))?;
    let cw_in = net.add_component(Source::new(CW_SOURCE))?;
    let cw_out = net.add_component(Sink::new(CW_SINK))?;

    let links = [
        (labels::LIVE_STEAM, PortRef::outlet(closer, 0), PortRef::inlet(turbine, 0)),
        (labels::TURBINE_EXHAUST, PortRef::outlet(turbine, 0), PortRef::inlet(condenser, 0)),
        (labels::CONDENSATE, PortRef::outlet(condenser, 0), PortRef::inlet(pump, 0)),
        (labels::FEED_WATER, PortRef::outlet(pump, 0), PortRef::inlet(boiler, 0)),
        (labels::BOILER_OUTLET, PortRef::outlet(boiler, 0), PortRef::inlet(closer, 0)),
        (labels::CW_INLET, PortRef::outlet(cw_in, 0), PortRef::inlet(condenser, 1)),
        (labels::CW_OUTLET, PortRef::outlet(condenser, 1), PortRef::inlet(cw_out, 0)),
    ];
    for (label, from, to) in links {
        net.add_connection(label, from, to)?;
    }

    if config.cooling_model == CoolingModel::Incompressible {
        let liquid = Arc::new(IncompressibleLiquid::water());
        for label in [labels::CW_INLET, labels::CW_OUTLET] {
            let id = connection(&net, label)?;
            net.connection_mut(id)?.set_fluid_model(liquid.clone());
        }
    }

    apply_config(&mut net, config)?;
    Ok(net)
}

/// Rewrite the plant specifications and parameters from `config`.
///
/// Earlier specifications on the plant's connections are released first,
/// so the network stays balanced across repeated calls. The cooling model
/// is fixed at build time and is not touched here.
pub fn apply_config(net: &mut Network, config: &RankineConfig) -> AppResult<()> {
    let eng = UnitSystem::engineering();
    let specs = [
        (
            labels::LIVE_STEAM,
            ConnAttrs::new()
                .t(config.live_steam_t)
                .p(config.live_steam_p)
                .m(config.live_steam_m),
        ),
        (labels::TURBINE_EXHAUST, ConnAttrs::new().p(config.condenser_p)),
        (labels::CW_INLET, ConnAttrs::new().t(config.cw_inlet_t).p(config.cw_p)),
        (labels::CW_OUTLET, ConnAttrs::new().t(config.cw_outlet_t)),
    ];
    for (label, attrs) in specs {
        let id = connection(net, label)?;
        let conn = net.connection_mut(id)?;
        conn.clear_specs();
        conn.set_attr(&eng, attrs)?;
    }

    net.set_param(TURBINE, "eta_s", config.turbine_eta_s)?;
    net.set_param(FEED_PUMP, "eta_s", config.pump_eta_s)?;
    net.set_param(STEAM_GENERATOR, "pr", config.boiler_pr)?;
    net.set_param(CONDENSER, "pr1", config.condenser_pr_hot)?;
    net.set_param(CONDENSER, "pr2", config.condenser_pr_cold)?;
    Ok(())
}

/// Structural and degrees-of-freedom check without solving.
pub fn check(config: &RankineConfig) -> AppResult<DofLedger> {
    let net = build_network(config)?;
    Ok(net.validate()?)
}

fn connection(net: &Network, label: &str) -> AppResult<ConnId> {
    net.connection_id(label)
        .ok_or_else(|| AppError::InvalidInput(format!("plant has no connection '{label}'")))
}
