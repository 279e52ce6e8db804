use super::{
    AtmosphereAccess, AtmosphereField, AutopilotAccess, FlightField, FlightStateAccess, HostCallError,
    HostError, HostValue, InstrumentAccess, MethodTable, PanelSpec, UiSurface,
};
use crate::autopilot::{SpeedMode, ui};
use crate::flight_data::MPS_TO_KNOTS;
use crate::warn;
use rand::Rng;
use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, RwLock, Weak},
};

/// Animation values as the host stores them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlightValues {
    pub ktas: Option<f64>,
    pub kias: Option<f64>,
    pub ground_speed: Option<f64>,
    pub mach: Option<f64>,
    pub altitude: Option<f64>,
}

impl FlightValues {
    pub fn get(&self, field: FlightField) -> Option<f64> {
        match field {
            FlightField::TrueAirspeedKnots => self.ktas,
            FlightField::IndicatedAirspeedKnots => self.kias,
            FlightField::GroundSpeedMps => self.ground_speed,
            FlightField::MachNumber => self.mach,
            FlightField::AltitudeFeet => self.altitude,
        }
    }

    pub fn set(&mut self, field: FlightField, value: Option<f64>) {
        let slot = match field {
            FlightField::TrueAirspeedKnots => &mut self.ktas,
            FlightField::IndicatedAirspeedKnots => &mut self.kias,
            FlightField::GroundSpeedMps => &mut self.ground_speed,
            FlightField::MachNumber => &mut self.mach,
            FlightField::AltitudeFeet => &mut self.altitude,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Weather {
    density: Option<f64>,
    sea_level_override: Option<f64>,
    temp_k: Option<f64>,
}

#[derive(Debug, Clone, Default)]
struct AutopilotState {
    on: bool,
    /// `values.speed`
    speed: Option<f64>,
    /// Separate `targetSpeed`; only some aircraft define it.
    target_speed: Option<f64>,
    mode: Option<SpeedMode>,
    /// Speed trend (kt/s) commanded by the last autopilot update.
    speed_command: f64,
    /// Indicated airspeed seen by the last autopilot update.
    last_seen_kias: Option<f64>,
    /// The cockpit's mode switch is disabled and refuses mode changes.
    mode_locked: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct UiElement {
    value: String,
    classes: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct Panel {
    spec: PanelSpec,
    left_px: f64,
    top_px: f64,
}

#[derive(Debug, Default)]
struct UiDocument {
    elements: HashMap<String, UiElement>,
    panels: HashMap<String, Panel>,
    texts: HashMap<String, String>,
    panel_creations: usize,
}

/// In-process stand-in for the browser simulator. Starts "loading" (no flight state)
/// until [`SimHost::populate`], then advances a one-axis speed model per [`SimHost::frame`].
pub struct SimHost {
    flight: RwLock<Option<FlightValues>>,
    weather: RwLock<Option<Weather>>,
    autopilot: RwLock<AutopilotState>,
    autopilot_methods: Arc<MethodTable>,
    instruments: Arc<MethodTable>,
    renderers: Arc<MethodTable>,
    readings: RwLock<HashMap<String, Option<f64>>>,
    ui: RwLock<UiDocument>,
}

impl SimHost {
    /// Autopilot speed gain in (kt/s) per kt of error.
    const AP_GAIN: f64 = 0.5;
    const AP_MAX_TREND: f64 = 5.0;
    const TURBULENCE_KT: f64 = 0.2;
    const FT_TO_M: f64 = 0.3048;
    /// Troposphere lapse rate (K/m).
    const LAPSE_RATE: f64 = 0.0065;
    /// `g / (R * L) - 1`, density exponent of the ISA troposphere.
    const DENSITY_EXP: f64 = 4.2559;

    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<SimHost>| {
            let autopilot_methods = Arc::new(MethodTable::new("geofs.autopilot"));
            let instruments = Arc::new(MethodTable::new("instruments"));
            let renderers = Arc::new(MethodTable::new("instruments.renderers"));
            Self::install_autopilot(&autopilot_methods, weak);
            Self::install_instruments(&instruments, &renderers, weak);

            let mut doc = UiDocument::default();
            for selector in [
                ui::SPEED_INPUT,
                ui::KNOTS_INPUT,
                ui::MACH_INPUT,
                ui::SWITCH_LEFT,
                ui::SWITCH_RIGHT,
            ] {
                doc.elements.insert(selector.to_string(), UiElement::default());
            }
            Self {
                flight: RwLock::new(None),
                weather: RwLock::new(None),
                autopilot: RwLock::new(AutopilotState::default()),
                autopilot_methods,
                instruments,
                renderers,
                readings: RwLock::new(HashMap::new()),
                ui: RwLock::new(doc),
            }
        })
    }

    fn install_autopilot(table: &MethodTable, weak: &Weak<SimHost>) {
        let host = weak.clone();
        table.set_method(
            "update",
            Arc::new(move |_args: &[HostValue]| {
                let host = host.upgrade().ok_or_else(|| HostCallError::Thrown("host unloaded".into()))?;
                host.autopilot_update();
                Ok(HostValue::Undefined)
            }),
        );
        let host = weak.clone();
        table.set_method(
            "setSpeedMode",
            Arc::new(move |args: &[HostValue]| {
                let host = host.upgrade().ok_or_else(|| HostCallError::Thrown("host unloaded".into()))?;
                let mode = args.first().and_then(HostValue::as_text).map_or(SpeedMode::Knots, SpeedMode::from);
                host.stock_set_speed_mode(mode);
                Ok(HostValue::Undefined)
            }),
        );
    }

    fn install_instruments(instruments: &MethodTable, renderers: &MethodTable, weak: &Weak<SimHost>) {
        let host = weak.clone();
        instruments.set_method(
            "update",
            Arc::new(move |_args: &[HostValue]| {
                let host = host.upgrade().ok_or_else(|| HostCallError::Thrown("host unloaded".into()))?;
                host.record("instruments.update", host.try_read(FlightField::IndicatedAirspeedKnots));
                Ok(HostValue::Undefined)
            }),
        );
        for (name, field) in [
            ("airspeed", FlightField::IndicatedAirspeedKnots),
            ("tas", FlightField::TrueAirspeedKnots),
            ("altimeter", FlightField::AltitudeFeet),
        ] {
            let host = weak.clone();
            renderers.set_method(
                name,
                Arc::new(move |_args: &[HostValue]| {
                    let host = host.upgrade().ok_or_else(|| HostCallError::Thrown("host unloaded".into()))?;
                    let seen = host.try_read(field);
                    host.record(name, seen);
                    Ok(seen.map_or(HostValue::Undefined, HostValue::Number))
                }),
            );
        }
        renderers.set_value("overlayCount", HostValue::Number(3.0));
    }

    /// Finishes "loading": creates the animation values and the weather model.
    pub fn populate(&self, altitude_ft: f64, tas_knots: f64) {
        let weather = Self::isa_weather(altitude_ft);
        if let Ok(mut w) = self.weather.write() {
            *w = Some(weather);
        }
        let mut values = FlightValues {
            ktas: Some(tas_knots),
            kias: Some(tas_knots),
            ground_speed: None,
            mach: None,
            altitude: Some(altitude_ft),
        };
        Self::derive(&mut values, &weather);
        if let Ok(mut f) = self.flight.write() {
            *f = Some(values);
        }
        if let Ok(mut ap) = self.autopilot.write() {
            ap.speed = Some(tas_knots.round());
            ap.mode = Some(SpeedMode::Knots);
        }
    }

    fn isa_weather(altitude_ft: f64) -> Weather {
        let temp_k = 288.15 - Self::LAPSE_RATE * altitude_ft * Self::FT_TO_M;
        let density = 1.225 * (temp_k / 288.15).powf(Self::DENSITY_EXP);
        Weather { density: Some(density), sea_level_override: None, temp_k: Some(temp_k) }
    }

    fn derive(values: &mut FlightValues, weather: &Weather) {
        let Some(tas) = values.ktas else { return };
        values.ground_speed = Some(tas / MPS_TO_KNOTS);
        values.mach = weather.temp_k.map(|t| tas / (38.96785 * t.sqrt()));
    }

    /// Advances the speed model by `dt_secs` and runs one frame of host callbacks
    /// through whatever currently sits in the method tables.
    pub fn frame(&self, dt_secs: f64) {
        self.step(dt_secs);
        let args = [HostValue::Number(dt_secs)];
        let mut calls = vec![(Arc::clone(&self.instruments), "update".to_string())];
        calls.extend(self.renderers.keys().into_iter().map(|k| (Arc::clone(&self.renderers), k)));
        calls.push((Arc::clone(&self.autopilot_methods), "update".to_string()));
        for (owner, key) in calls {
            if owner.method(&key).is_none() {
                continue;
            }
            if let Err(e) = owner.call(&key, &args) {
                warn!("Host frame callback {}.{key} failed: {e}", owner.id());
            }
        }
    }

    fn step(&self, dt_secs: f64) {
        let trend = self.autopilot.read().map_or(0.0, |ap| if ap.on { ap.speed_command } else { 0.0 });
        let gust = rand::rng().random_range(-Self::TURBULENCE_KT..=Self::TURBULENCE_KT);
        let weather = self.weather.read().ok().and_then(|w| *w).unwrap_or_default();
        if let Ok(mut flight) = self.flight.write() {
            if let Some(values) = flight.as_mut() {
                let tas = (values.ktas.unwrap_or(0.0) + trend * dt_secs + gust).max(0.0);
                values.ktas = Some(tas);
                values.kias = Some(tas);
                Self::derive(values, &weather);
            }
        }
    }

    fn autopilot_update(&self) {
        let kias = self.try_read(FlightField::IndicatedAirspeedKnots);
        if let Ok(mut ap) = self.autopilot.write() {
            ap.last_seen_kias = kias;
            if !ap.on || ap.mode != Some(SpeedMode::Knots) {
                ap.speed_command = 0.0;
                return;
            }
            let error = ap.target_speed.or(ap.speed).unwrap_or(0.0) - kias.unwrap_or(0.0);
            ap.speed_command = (error * Self::AP_GAIN).clamp(-Self::AP_MAX_TREND, Self::AP_MAX_TREND);
        }
    }

    /// The host's own mode switch: converts with sea-level sound speed only.
    fn stock_set_speed_mode(&self, mode: SpeedMode) {
        if let Ok(mut ap) = self.autopilot.write() {
            if ap.mode == Some(mode) {
                return;
            }
            ap.speed = ap.speed.map(|v| match mode {
                SpeedMode::Mach => v / 661.47,
                SpeedMode::Knots => v * 661.47,
            });
            ap.mode = Some(mode);
        }
    }

    fn record(&self, name: &str, value: Option<f64>) {
        if let Ok(mut readings) = self.readings.write() {
            readings.insert(name.to_string(), value);
        }
    }

    // Direct host-side manipulation, as the simulator's own code would do it.

    pub fn set_engaged(&self, on: bool) {
        if let Ok(mut ap) = self.autopilot.write() {
            ap.on = on;
        }
    }

    pub fn autopilot_speed(&self) -> Option<f64> { self.autopilot.read().ok().and_then(|ap| ap.speed) }

    pub fn autopilot_seen_kias(&self) -> Option<f64> {
        self.autopilot.read().ok().and_then(|ap| ap.last_seen_kias)
    }

    /// Value observed by the named instrument during its last call, `None` if never called.
    pub fn reading(&self, name: &str) -> Option<Option<f64>> {
        self.readings.read().ok().and_then(|r| r.get(name).copied())
    }

    /// Current value of the input element matching `selector`.
    pub fn element_value(&self, selector: &str) -> Option<String> {
        self.ui.read().ok().and_then(|ui| ui.elements.get(selector).map(|e| e.value.clone()))
    }

    pub fn panel_position(&self, id: &str) -> Option<(f64, f64)> {
        self.ui.read().ok().and_then(|ui| ui.panels.get(id).map(|p| (p.left_px, p.top_px)))
    }
}

/// State inspection and direct manipulation for tests.
#[cfg(test)]
impl SimHost {
    pub fn flight_values(&self) -> Option<FlightValues> { self.flight.read().ok().and_then(|f| *f) }

    pub fn set_weather(&self, density: Option<f64>, sea_level_override: Option<f64>, temp_k: Option<f64>) {
        if let Ok(mut w) = self.weather.write() {
            *w = Some(Weather { density, sea_level_override, temp_k });
        }
    }

    pub fn clear_weather(&self) {
        if let Ok(mut w) = self.weather.write() {
            *w = None;
        }
    }

    pub fn set_autopilot_speed(&self, speed: Option<f64>) {
        if let Ok(mut ap) = self.autopilot.write() {
            ap.speed = speed;
        }
    }

    /// Gives the autopilot a separate `targetSpeed` field.
    pub fn define_target_speed(&self, value: f64) {
        if let Ok(mut ap) = self.autopilot.write() {
            ap.target_speed = Some(value);
        }
    }

    pub fn autopilot_target_speed(&self) -> Option<f64> {
        self.autopilot.read().ok().and_then(|ap| ap.target_speed)
    }

    pub fn element_has_class(&self, selector: &str, class: &str) -> bool {
        self.ui
            .read()
            .is_ok_and(|ui| ui.elements.get(selector).is_some_and(|e| e.classes.contains(class)))
    }

    pub fn text(&self, id: &str) -> Option<String> {
        self.ui.read().ok().and_then(|ui| ui.texts.get(id).cloned())
    }

    pub fn panel_creations(&self) -> usize { self.ui.read().map_or(0, |ui| ui.panel_creations) }

    /// Removes a panel and its text fields, as closing it in the page would.
    pub fn remove_panel(&self, id: &str) {
        if let Ok(mut ui) = self.ui.write() {
            if let Some(panel) = ui.panels.remove(id) {
                for (_, field_id, _, _) in panel.spec.rows {
                    ui.texts.remove(field_id);
                }
            }
        }
    }

    /// Disables the cockpit's mode switch so mode changes are refused.
    pub fn lock_speed_mode(&self, locked: bool) {
        if let Ok(mut ap) = self.autopilot.write() {
            ap.mode_locked = locked;
        }
    }
}

impl FlightStateAccess for SimHost {
    fn has_flight_state(&self) -> bool { self.flight.read().is_ok_and(|f| f.is_some()) }

    fn try_read(&self, field: FlightField) -> Option<f64> {
        self.flight.read().ok()?.as_ref()?.get(field)
    }

    fn write(&self, field: FlightField, value: Option<f64>) -> Result<(), HostError> {
        let mut flight = self.flight.write()?;
        let values = flight.as_mut().ok_or(HostError::StateAbsent)?;
        values.set(field, value);
        Ok(())
    }
}

impl AtmosphereAccess for SimHost {
    fn try_read_atmosphere(&self, field: AtmosphereField) -> Option<f64> {
        let weather = (*self.weather.read().ok()?)?;
        match field {
            AtmosphereField::AirDensityAtAltitude => weather.density,
            AtmosphereField::SeaLevelDensityOverride => weather.sea_level_override,
            AtmosphereField::AirTemperatureKelvin => weather.temp_k,
        }
    }
}

impl AutopilotAccess for SimHost {
    fn autopilot_methods(&self) -> Option<Arc<MethodTable>> { Some(Arc::clone(&self.autopilot_methods)) }

    fn engaged(&self) -> Option<bool> { self.autopilot.read().ok().map(|ap| ap.on) }

    fn target_value(&self) -> Option<f64> { self.autopilot_speed() }

    fn set_target_value(&self, value: f64) -> Result<(), HostError> {
        let mut ap = self.autopilot.write()?;
        ap.speed = Some(value);
        if ap.target_speed.is_some() {
            ap.target_speed = Some(value);
        }
        Ok(())
    }

    fn speed_mode(&self) -> Option<SpeedMode> { self.autopilot.read().ok().and_then(|ap| ap.mode) }

    fn set_speed_mode(&self, mode: SpeedMode) -> Result<(), HostError> {
        let mut ap = self.autopilot.write()?;
        if ap.mode_locked {
            return Err(HostError::Rejected);
        }
        ap.mode = Some(mode);
        Ok(())
    }
}

impl InstrumentAccess for SimHost {
    fn instrument_methods(&self) -> Option<Arc<MethodTable>> { Some(Arc::clone(&self.instruments)) }

    fn renderer_methods(&self) -> Option<Arc<MethodTable>> { Some(Arc::clone(&self.renderers)) }
}

impl UiSurface for SimHost {
    fn set_element_value(&self, selector: &str, value: &str) -> bool {
        let Ok(mut ui) = self.ui.write() else { return false };
        ui.elements.get_mut(selector).map(|e| e.value = value.to_string()).is_some()
    }

    fn set_element_class(&self, selector: &str, class: &str, present: bool) -> bool {
        let Ok(mut ui) = self.ui.write() else { return false };
        let Some(element) = ui.elements.get_mut(selector) else { return false };
        if present {
            element.classes.insert(class.to_string());
        } else {
            element.classes.remove(class);
        }
        true
    }

    fn panel_exists(&self, id: &str) -> bool { self.ui.read().is_ok_and(|ui| ui.panels.contains_key(id)) }

    fn create_panel(&self, panel: &PanelSpec) {
        let Ok(mut ui) = self.ui.write() else { return };
        for (_, field_id, initial, _) in &panel.rows {
            ui.texts.insert((*field_id).to_string(), (*initial).to_string());
        }
        ui.panels.insert(
            panel.id.to_string(),
            Panel { spec: panel.clone(), left_px: panel.left_px, top_px: panel.top_px },
        );
        ui.panel_creations += 1;
    }

    fn set_text(&self, id: &str, text: &str) -> bool {
        let Ok(mut ui) = self.ui.write() else { return false };
        ui.texts.get_mut(id).map(|t| *t = text.to_string()).is_some()
    }

    fn move_panel(&self, id: &str, left_px: f64, top_px: f64) -> bool {
        let Ok(mut ui) = self.ui.write() else { return false };
        let Some(panel) = ui.panels.get_mut(id) else { return false };
        panel.left_px = left_px;
        panel.top_px = top_px;
        true
    }
}
