// cvar.rs — Physics tuning variables
//
// Named string/float variables with archive, write-protect, and latch flags.
// `PhysicsSettings` is the typed snapshot the stepper and handlers read.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info};

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CvarFlags: u32 {
        /// Written out by `write_variables`.
        const ARCHIVE = 0x01;
        /// Cannot be changed by `set`, only by `force_set`.
        const NOSET   = 0x02;
        /// Changes are held until `apply_latched` is called.
        const LATCH   = 0x04;
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CvarError {
    #[error("unknown variable \"{0}\"")]
    UnknownVariable(String),
    #[error("invalid value \"{value}\" for {name}")]
    InvalidValue { name: String, value: String },
    #[error("{0} is write protected")]
    ReadOnly(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// A console variable.
#[derive(Clone, Debug)]
pub struct Cvar {
    pub name: String,
    pub string: String,
    pub latched_string: Option<String>,
    pub flags: CvarFlags,
    pub modified: bool,
    pub value: f32,
}

#[derive(Clone, Debug, Default)]
pub struct CvarContext {
    pub cvar_vars: Vec<Cvar>,
    cvar_index: HashMap<String, usize>,
}

impl CvarContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every physics variable at its default.
    pub fn with_physics_defaults() -> Self {
        let mut ctx = Self::new();
        for (name, value) in PHYSICS_CVARS {
            ctx.get(name, value, CvarFlags::ARCHIVE);
        }
        ctx
    }

    pub fn find_var(&self, name: &str) -> Option<&Cvar> {
        self.cvar_index.get(name).map(|&idx| &self.cvar_vars[idx])
    }

    /// Get the floating-point value of a cvar. Returns 0 if not found.
    pub fn variable_value(&self, name: &str) -> f32 {
        self.find_var(name).map_or(0.0, |var| var.value)
    }

    /// Get the string value of a cvar. Returns "" if not found.
    pub fn variable_string(&self, name: &str) -> &str {
        self.find_var(name).map_or("", |var| var.string.as_str())
    }

    /// Get or create a cvar. If it already exists, the value is not changed
    /// but flags are OR'd in.
    pub fn get(&mut self, name: &str, value: &str, flags: CvarFlags) -> usize {
        if let Some(&idx) = self.cvar_index.get(name) {
            self.cvar_vars[idx].flags |= flags;
            return idx;
        }

        let idx = self.cvar_vars.len();
        self.cvar_vars.push(Cvar {
            name: name.to_string(),
            string: value.to_string(),
            latched_string: None,
            flags,
            modified: true,
            value: parse_value(value),
        });
        self.cvar_index.insert(name.to_string(), idx);
        idx
    }

    fn set2(&mut self, name: &str, value: &str, force: bool) -> Result<usize, CvarError> {
        let idx = *self
            .cvar_index
            .get(name)
            .ok_or_else(|| CvarError::UnknownVariable(name.to_string()))?;
        let var = &mut self.cvar_vars[idx];

        if !force {
            if var.flags.contains(CvarFlags::NOSET) {
                return Err(CvarError::ReadOnly(name.to_string()));
            }

            if var.flags.contains(CvarFlags::LATCH) {
                let pending = var.latched_string.as_deref().unwrap_or(&var.string);
                if value != pending {
                    info!(cvar = name, value, "will be changed on next apply");
                    var.latched_string = Some(value.to_string());
                }
                return Ok(idx);
            }
        } else {
            var.latched_string = None;
        }

        if value == var.string {
            return Ok(idx);
        }

        var.modified = true;
        var.string = value.to_string();
        var.value = parse_value(value);
        debug!(cvar = name, value, "cvar set");
        Ok(idx)
    }

    /// Set a cvar value (respects NOSET and LATCH flags).
    pub fn set(&mut self, name: &str, value: &str) -> Result<usize, CvarError> {
        self.set2(name, value, false)
    }

    /// Force-set a cvar value (ignores NOSET and LATCH).
    pub fn force_set(&mut self, name: &str, value: &str) -> Result<usize, CvarError> {
        self.set2(name, value, true)
    }

    /// Set a cvar from a float value.
    pub fn set_value(&mut self, name: &str, value: f32) -> Result<usize, CvarError> {
        let val_str = if value == (value as i32) as f32 {
            format!("{}", value as i32)
        } else {
            format!("{}", value)
        };
        self.set(name, &val_str)
    }

    /// Apply all latched variable changes.
    pub fn apply_latched(&mut self) {
        for var in &mut self.cvar_vars {
            if let Some(latched) = var.latched_string.take() {
                var.value = parse_value(&latched);
                var.string = latched;
                var.modified = true;
            }
        }
    }

    /// Executes `set <name> <value>` lines. Blank lines and `//` comments are
    /// skipped. Returns the number of variables set.
    pub fn exec_text(&mut self, text: &str) -> Result<usize, CvarError> {
        let mut count = 0;
        for (lineno, raw) in text.lines().enumerate() {
            let line = match raw.find("//") {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            let mut tokens = line.split_whitespace();
            let Some(cmd) = tokens.next() else {
                continue;
            };
            if cmd != "set" {
                return Err(CvarError::Parse {
                    line: lineno + 1,
                    message: format!("unknown command \"{}\"", cmd),
                });
            }
            let (Some(name), Some(value)) = (tokens.next(), tokens.next()) else {
                return Err(CvarError::Parse {
                    line: lineno + 1,
                    message: "usage: set <variable> <value>".to_string(),
                });
            };
            self.set(name, value.trim_matches('"'))?;
            count += 1;
        }
        Ok(count)
    }

    /// Write all archived cvars to a writer.
    pub fn write_variables(&self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        for var in &self.cvar_vars {
            if var.flags.contains(CvarFlags::ARCHIVE) {
                writeln!(writer, "set {} \"{}\"", var.name, var.string)?;
            }
        }
        Ok(())
    }
}

fn parse_value(s: &str) -> f32 {
    s.trim().parse::<f32>().unwrap_or(0.0)
}

// ============================================================
// Physics settings
// ============================================================

pub const PHYS_FIX_COLLISION_BUGS: &str = "phys_fix_collision_bugs";
pub const PHYS_FIX_FALSE_LEDGE_GRAB: &str = "phys_fix_false_ledge_grab";
pub const PHYS_FIX_GROUND_POUND_BONKS: &str = "phys_fix_ground_pound_bonks";
pub const PHYS_BOUNCY_BOUNDS: &str = "phys_bouncy_bounds";
pub const PHYS_AIR_HIT_WALL_REENTRY: &str = "phys_air_hit_wall_reentry";
pub const PHYS_MAX_REDISPATCH: &str = "phys_max_redispatch";

const PHYSICS_CVARS: [(&str, &str); 6] = [
    (PHYS_FIX_COLLISION_BUGS, "0"),
    (PHYS_FIX_FALSE_LEDGE_GRAB, "0"),
    (PHYS_FIX_GROUND_POUND_BONKS, "0"),
    (PHYS_BOUNCY_BOUNDS, "0"),
    (PHYS_AIR_HIT_WALL_REENTRY, "1"),
    (PHYS_MAX_REDISPATCH, "8"),
];

/// What happens when an actor steps past the edge of the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BouncyBounds {
    /// Stop against the boundary like a wall.
    #[default]
    Off,
    /// Reverse facing and multiply forward speed by 1.5.
    On,
    /// As `On`, with the resulting speed clamped to ±500.
    OnCapped,
}

/// Session-wide physics options, read by every actor each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsSettings {
    /// Consider every wall touched in a sub-step instead of only the last.
    pub fix_collision_bugs: bool,
    /// Reject ledges whose floor is steeper than ~25 degrees. Needs
    /// `fix_collision_bugs` as well.
    pub fix_false_ledge_grab: bool,
    /// Ground pounds that hit a wall keep falling instead of bonking.
    pub fix_ground_pound_bonks: bool,
    pub bouncy_bounds: BouncyBounds,
    /// The wall-hit action re-dispatches itself within the same tick.
    pub air_hit_wall_reentry: bool,
    /// Upper bound on handler re-dispatches per actor per tick.
    pub max_redispatch: u32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fix_collision_bugs: false,
            fix_false_ledge_grab: false,
            fix_ground_pound_bonks: false,
            bouncy_bounds: BouncyBounds::Off,
            air_hit_wall_reentry: true,
            max_redispatch: 8,
        }
    }
}

impl PhysicsSettings {
    /// Snapshot the physics variables. Missing variables keep their defaults.
    pub fn from_cvars(ctx: &CvarContext) -> Result<Self, CvarError> {
        let mut settings = Self::default();
        let flag = |name: &str, default: bool| ctx.find_var(name).map_or(default, |v| v.value != 0.0);

        settings.fix_collision_bugs = flag(PHYS_FIX_COLLISION_BUGS, settings.fix_collision_bugs);
        settings.fix_false_ledge_grab = flag(PHYS_FIX_FALSE_LEDGE_GRAB, settings.fix_false_ledge_grab);
        settings.fix_ground_pound_bonks = flag(PHYS_FIX_GROUND_POUND_BONKS, settings.fix_ground_pound_bonks);
        settings.air_hit_wall_reentry = flag(PHYS_AIR_HIT_WALL_REENTRY, settings.air_hit_wall_reentry);

        if let Some(var) = ctx.find_var(PHYS_BOUNCY_BOUNDS) {
            settings.bouncy_bounds = match var.string.trim() {
                "0" => BouncyBounds::Off,
                "1" => BouncyBounds::On,
                "2" => BouncyBounds::OnCapped,
                other => {
                    return Err(CvarError::InvalidValue {
                        name: PHYS_BOUNCY_BOUNDS.to_string(),
                        value: other.to_string(),
                    })
                }
            };
        }

        if let Some(var) = ctx.find_var(PHYS_MAX_REDISPATCH) {
            settings.max_redispatch = var.string.trim().parse::<u32>().map_err(|_| CvarError::InvalidValue {
                name: PHYS_MAX_REDISPATCH.to_string(),
                value: var.string.clone(),
            })?;
        }

        Ok(settings)
    }
}
