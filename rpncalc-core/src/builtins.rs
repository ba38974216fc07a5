// Command table - every named command, its aliases and its help text
//
// Builtin is a closed enum; `run` routes each variant to its handler in `primitives`.
// The table is built once and looked up by any alias.

use crate::primitives;
use crate::session::Session;
use crate::value::Result;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    // Stack manipulation
    Undo,
    Flip,
    Clear,
    Clean,
    Delete,
    Copy,
    Swap,
    Up,
    Down,
    Reverse,
    Sort,
    SwapStacks,
    Load,
    Import,
    Export,

    // Arithmetic
    Modulus,
    SquareRoot,
    Round,
    Absolute,
    Integer,
    Factorial,
    Log,
    Log10,
    Hypotenuse,

    // Statistics
    AddAll,
    Mean,
    Median,
    StdDev,
    Minimum,
    Maximum,
    LinearRegression,

    // Trigonometry
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,

    // Conversions
    Fraction,
    ToPercent,
    FromPercent,
    Convert,
    UnitShortcut { from: &'static str, to: &'static str },

    // Constants
    Pi,
    Phi,
    EulersNumber,
    EulersConstant,
    SpeedOfLight,

    // Random numbers
    Random,
    Dice,

    // Memory slots and user functions
    Memory,
    Record,
    Function,

    // Session
    List,
    Set,
    Reset,
    Debug,
    Version,
    License,
    Help,
    Exit,
    ClearExit,
}

impl Builtin {
    /// Whether running this command is captured while recording a user function.
    pub fn is_recordable(self) -> bool {
        !matches!(
            self,
            Builtin::List
                | Builtin::Debug
                | Builtin::Version
                | Builtin::Help
                | Builtin::Record
                | Builtin::Function
                | Builtin::Reset
                | Builtin::Exit
                | Builtin::ClearExit
        )
    }

    pub fn run(self, session: &mut Session, param: &str) -> Result<()> {
        use primitives::*;
        match self {
            Builtin::Undo => stack_ops::undo_impl(session, param),
            Builtin::Flip => arithmetic::flip_sign_impl(session),
            Builtin::Clear => stack_ops::clear_impl(session),
            Builtin::Clean => stack_ops::clean_impl(session),
            Builtin::Delete => stack_ops::delete_impl(session, param),
            Builtin::Copy => stack_ops::copy_impl(session, param),
            Builtin::Swap => stack_ops::swap_impl(session, param),
            Builtin::Up => stack_ops::up_impl(session),
            Builtin::Down => stack_ops::down_impl(session),
            Builtin::Reverse => stack_ops::reverse_impl(session),
            Builtin::Sort => stack_ops::sort_impl(session, param),
            Builtin::SwapStacks => stack_ops::swap_stacks_impl(session),
            Builtin::Load => stack_ops::load_impl(session, param),
            Builtin::Import => stack_ops::import_impl(session, param),
            Builtin::Export => stack_ops::export_impl(session, param),

            Builtin::Modulus => arithmetic::modulus_impl(session),
            Builtin::SquareRoot => arithmetic::sqrt_impl(session),
            Builtin::Round => arithmetic::round_impl(session, param),
            Builtin::Absolute => arithmetic::abs_impl(session),
            Builtin::Integer => arithmetic::int_impl(session),
            Builtin::Factorial => arithmetic::factorial_impl(session),
            Builtin::Log => arithmetic::log_impl(session),
            Builtin::Log10 => arithmetic::log10_impl(session),
            Builtin::Hypotenuse => arithmetic::hypotenuse_impl(session),

            Builtin::AddAll => stats::add_all_impl(session, param),
            Builtin::Mean => stats::mean_impl(session, param),
            Builtin::Median => stats::median_impl(session, param),
            Builtin::StdDev => stats::std_dev_impl(session, param),
            Builtin::Minimum => stats::min_impl(session),
            Builtin::Maximum => stats::max_impl(session),
            Builtin::LinearRegression => stats::linear_regression_impl(session, param),

            Builtin::Sin => trig::trig_impl(session, trig::TrigFn::Sin, param),
            Builtin::Cos => trig::trig_impl(session, trig::TrigFn::Cos, param),
            Builtin::Tan => trig::trig_impl(session, trig::TrigFn::Tan, param),
            Builtin::Asin => trig::trig_impl(session, trig::TrigFn::Asin, param),
            Builtin::Acos => trig::trig_impl(session, trig::TrigFn::Acos, param),
            Builtin::Atan => trig::trig_impl(session, trig::TrigFn::Atan, param),

            Builtin::Fraction => conversions::fraction_impl(session, param),
            Builtin::ToPercent => conversions::to_percent_impl(session),
            Builtin::FromPercent => conversions::from_percent_impl(session),
            Builtin::Convert => conversions::convert_impl(session, param),
            Builtin::UnitShortcut { from, to } => conversions::shortcut_impl(session, from, to),

            Builtin::Pi => constants::pi_impl(session),
            Builtin::Phi => constants::phi_impl(session),
            Builtin::EulersNumber => constants::eulers_number_impl(session),
            Builtin::EulersConstant => constants::eulers_constant_impl(session),
            Builtin::SpeedOfLight => constants::speed_of_light_impl(session),

            Builtin::Random => random::random_impl(session, param),
            Builtin::Dice => random::dice_impl(session, param),

            Builtin::Memory => memory::mem_impl(session, param),
            Builtin::Record => functions::record_impl(session, param),
            Builtin::Function => functions::function_impl(session, param),

            Builtin::List => lists::list_impl(session, param),
            Builtin::Set => settings::set_impl(session, param),
            Builtin::Reset => settings::reset_impl(session),
            Builtin::Debug => settings::debug_impl(session),
            Builtin::Version => settings::version_impl(session),
            Builtin::License => settings::license_impl(session),
            Builtin::Help => settings::help_impl(session),
            Builtin::Exit => settings::exit_impl(session),
            Builtin::ClearExit => settings::clear_exit_impl(session),
        }
    }
}

#[derive(Debug)]
pub struct BuiltinEntry {
    pub names: &'static [&'static str],
    pub builtin: Builtin,
    pub doc: &'static str,
}

impl BuiltinEntry {
    pub fn name(&self) -> &'static str {
        self.names[0]
    }
}

pub struct Registry {
    entries: Vec<BuiltinEntry>,
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn entries(&self) -> &[BuiltinEntry] {
        &self.entries
    }

    pub fn lookup(&self, name: &str) -> Option<&BuiltinEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }
}

/// Find a command by any of its names. Names are lower-case.
pub fn lookup(name: &str) -> Option<&'static BuiltinEntry> {
    registry().lookup(name)
}

pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn build_registry() -> Registry {
    let mut registry = Registry {
        entries: Vec::new(),
        by_name: HashMap::new(),
    };

    // Helper to add a builtin under all of its names
    let mut add_builtin = |names: &'static [&'static str], builtin: Builtin, doc: &'static str| {
        let index = registry.entries.len();
        for name in names {
            registry.by_name.insert(*name, index);
        }
        registry.entries.push(BuiltinEntry {
            names,
            builtin,
            doc,
        });
    };

    // Stack manipulation
    add_builtin(&["undo", "u"], Builtin::Undo,
        "Undo the last change, or roll back to a line of 'list undo'.\nUsage: undo [n]\nExample: 5 6 + undo => 5 6");
    add_builtin(&["flip", "f"], Builtin::Flip,
        "Flip the sign of the top value.\nUsage: x flip => -x\nExample: 5 flip => -5");
    add_builtin(&["clear", "c"], Builtin::Clear,
        "Remove every value from the stack.\nUsage: clear");
    add_builtin(&["clean", "cl"], Builtin::Clean,
        "Clear the screen. The stack is untouched.\nUsage: clean");
    add_builtin(&["delete", "del", "d"], Builtin::Delete,
        "Delete a line, a range of lines, or the top value.\nUsage: delete [line | a-b | -n]\nExample: 1 2 3 delete 2-3 => 3");
    add_builtin(&["copy", "dup"], Builtin::Copy,
        "Copy a line (default the top) onto the top of the stack.\nUsage: copy [line]\nExample: 4 copy => 4 4");
    add_builtin(&["swap", "s"], Builtin::Swap,
        "Swap two lines, the top two by default.\nUsage: swap [l1 l2]\nExample: 1 2 swap => 2 1");
    add_builtin(&["up"], Builtin::Up,
        "Move the bottom value to the top.\nUsage: up\nExample: 1 2 3 up => 2 3 1");
    add_builtin(&["down"], Builtin::Down,
        "Move the top value to the bottom.\nUsage: down\nExample: 1 2 3 down => 3 1 2");
    add_builtin(&["reverse", "rev"], Builtin::Reverse,
        "Reverse the order of the stack.\nUsage: reverse\nExample: 1 2 3 reverse => 3 2 1");
    add_builtin(&["sort"], Builtin::Sort,
        "Sort the stack. Ascending leaves the smallest value on top.\nUsage: sort a|d\nExample: 3 1 2 sort a => 3 2 1");
    add_builtin(&["ss"], Builtin::SwapStacks,
        "Swap the primary and secondary stacks.\nUsage: ss");
    add_builtin(&["load"], Builtin::Load,
        "Save both stacks, then load the named stack pair.\nUsage: load NAME\nExample: load taxes");
    add_builtin(&["import"], Builtin::Import,
        "Replace the stack with values read from a file, one per line.\nUsage: import FILE");
    add_builtin(&["export"], Builtin::Export,
        "Write the stack to a file, one value per line, bottom first.\nUsage: export FILE");

    // Arithmetic
    add_builtin(&["modulus", "mod"], Builtin::Modulus,
        "Remainder of truncated division.\nUsage: a b mod => remainder\nExample: 13 5 mod => 3");
    add_builtin(&["sqrt"], Builtin::SquareRoot,
        "Square root.\nUsage: n sqrt => sqrt(n)\nExample: 16 sqrt => 4");
    add_builtin(&["round"], Builtin::Round,
        "Round half-up to a number of decimal places (default 0).\nUsage: x round [n]\nExample: 3.14159 round 2 => 3.14");
    add_builtin(&["abs"], Builtin::Absolute,
        "Absolute value.\nUsage: n abs => |n|\nExample: -5 abs => 5");
    add_builtin(&["int"], Builtin::Integer,
        "Drop the fractional part.\nUsage: x int\nExample: -7.9 int => -7");
    add_builtin(&["factorial", "fact"], Builtin::Factorial,
        "Factorial of a positive integer.\nUsage: n factorial => n!\nExample: 5 fact => 120");
    add_builtin(&["log"], Builtin::Log,
        "Natural logarithm.\nUsage: n log => ln(n)");
    add_builtin(&["log10"], Builtin::Log10,
        "Base-10 logarithm.\nUsage: n log10\nExample: 1000 log10 => 3");
    add_builtin(&["hypotenuse", "hypot"], Builtin::Hypotenuse,
        "Hypotenuse of a right triangle.\nUsage: a b hypot => sqrt(a^2 + b^2)\nExample: 3 4 hypot => 5");

    // Statistics
    add_builtin(&["addall", "aa"], Builtin::AddAll,
        "Sum every value. 'keep' leaves the stack in place and appends the sum.\nUsage: addall [keep]\nExample: 1 2 3 aa => 6");
    add_builtin(&["mean", "average", "avg"], Builtin::Mean,
        "Mean of every value.\nUsage: mean [keep]\nExample: 1 2 3 4 avg => 2.5");
    add_builtin(&["median"], Builtin::Median,
        "Median of every value.\nUsage: median [keep]\nExample: 5 1 3 median => 3");
    add_builtin(&["sd"], Builtin::StdDev,
        "Population standard deviation of every value.\nUsage: sd [keep]");
    add_builtin(&["min"], Builtin::Minimum,
        "Append the smallest value on the stack.\nUsage: min\nExample: 3 1 2 min => 3 1 2 1");
    add_builtin(&["max"], Builtin::Maximum,
        "Append the largest value on the stack.\nUsage: max\nExample: 3 1 2 max => 3 1 2 3");
    add_builtin(&["lr"], Builtin::LinearRegression,
        "Linear regression over the stack, predicting the value at x (default: the next line).\nUsage: lr [x] [add]\nExample: 2 4 6 lr => y = 2x + 0, prediction 8");

    // Trigonometry
    add_builtin(&["sin"], Builtin::Sin,
        "Sine. Degrees by default, 'rad' for radians.\nUsage: angle sin [rad]\nExample: 30 sin => 0.5");
    add_builtin(&["cos"], Builtin::Cos,
        "Cosine. Degrees by default, 'rad' for radians.\nUsage: angle cos [rad]\nExample: 60 cos => 0.5");
    add_builtin(&["tan"], Builtin::Tan,
        "Tangent. Degrees by default, 'rad' for radians.\nUsage: angle tan [rad]\nExample: 45 tan => 1");
    add_builtin(&["asin"], Builtin::Asin,
        "Arc sine. Result in degrees unless 'rad' is given.\nUsage: x asin [rad]\nExample: 0.5 asin => 30");
    add_builtin(&["acos"], Builtin::Acos,
        "Arc cosine. Result in degrees unless 'rad' is given.\nUsage: x acos [rad]");
    add_builtin(&["atan"], Builtin::Atan,
        "Arc tangent. Result in degrees unless 'rad' is given.\nUsage: x atan [rad]\nExample: 1 atan => 45");

    // Conversions
    add_builtin(&["fraction", "frac"], Builtin::Fraction,
        "Show the top value as a fraction in units of 1/base (default 64).\nUsage: x frac [base]\nExample: 1.1875 frac => 1 3/16");
    add_builtin(&["to%"], Builtin::ToPercent,
        "Turn a decimal into a percentage.\nUsage: x to%\nExample: 0.25 to% => 25");
    add_builtin(&["from%"], Builtin::FromPercent,
        "Turn a percentage into a decimal.\nUsage: x from%\nExample: 25 from% => 0.25");
    add_builtin(&["convert", "conv"], Builtin::Convert,
        "Convert the top value between units of the same kind.\nUsage: x convert FROM TO\nExample: 1 convert mi km => 1.609344\nRun 'convert' alone to list the known units.");
    add_builtin(&["in2mm"], Builtin::UnitShortcut { from: "in", to: "mm" },
        "Inches to millimeters.\nUsage: x in2mm\nExample: 1 in2mm => 25.4");
    add_builtin(&["mm2in"], Builtin::UnitShortcut { from: "mm", to: "in" },
        "Millimeters to inches.\nUsage: x mm2in");
    add_builtin(&["in2ft"], Builtin::UnitShortcut { from: "in", to: "ft" },
        "Inches to feet.\nUsage: x in2ft\nExample: 24 in2ft => 2");
    add_builtin(&["ft2in"], Builtin::UnitShortcut { from: "ft", to: "in" },
        "Feet to inches.\nUsage: x ft2in\nExample: 2 ft2in => 24");
    add_builtin(&["deg2rad"], Builtin::UnitShortcut { from: "deg", to: "rad" },
        "Degrees to radians.\nUsage: x deg2rad");
    add_builtin(&["rad2deg"], Builtin::UnitShortcut { from: "rad", to: "deg" },
        "Radians to degrees.\nUsage: x rad2deg");
    add_builtin(&["gram2oz"], Builtin::UnitShortcut { from: "g", to: "oz" },
        "Grams to ounces.\nUsage: x gram2oz");
    add_builtin(&["oz2gram"], Builtin::UnitShortcut { from: "oz", to: "g" },
        "Ounces to grams.\nUsage: x oz2gram");
    add_builtin(&["kg2lb"], Builtin::UnitShortcut { from: "kg", to: "lb" },
        "Kilograms to pounds.\nUsage: x kg2lb");
    add_builtin(&["lb2kg"], Builtin::UnitShortcut { from: "lb", to: "kg" },
        "Pounds to kilograms.\nUsage: x lb2kg\nExample: 1 lb2kg => 0.45359237");

    // Constants
    add_builtin(&["pi"], Builtin::Pi,
        "Push pi.\nUsage: pi");
    add_builtin(&["phi"], Builtin::Phi,
        "Push the golden ratio, showing the golden sections of the top value.\nUsage: phi");
    add_builtin(&["eulersnumber", "eulersnum"], Builtin::EulersNumber,
        "Push Euler's number e.\nUsage: eulersnum");
    add_builtin(&["eulersconstant", "eulersconst"], Builtin::EulersConstant,
        "Push the Euler-Mascheroni constant.\nUsage: eulersconst");
    add_builtin(&["speedoflight", "sol"], Builtin::SpeedOfLight,
        "Push the speed of light in meters per second.\nUsage: sol");

    // Random numbers
    add_builtin(&["random", "rand"], Builtin::Random,
        "Push a random integer between low and high inclusive (default 1 100).\nUsage: rand [low high]\nExample: rand 1 6");
    add_builtin(&["dice", "roll"], Builtin::Dice,
        "Roll dice, pushing each result.\nUsage: dice [XdY]\nExample: dice 3d6");

    // Memory slots and user functions
    add_builtin(&["memory", "mem"], Builtin::Memory,
        "Work with memory slots (slot 0 by default).\nUsage: mem [slot] add|clr|clrall|copy|copyall|addall\nExample: mem 2 add");
    add_builtin(&["record", "rec"], Builtin::Record,
        "Record commands into a user function.\nUsage: rec on | rec off NAME\nExample: rec on, 2 *, rec off double");
    add_builtin(&["function", "func"], Builtin::Function,
        "Delete user functions.\nUsage: func del NAME | func delall");

    // Session
    add_builtin(&["list"], Builtin::List,
        "List saved stacks, memory, undo history, functions or the command history.\nUsage: list stacks|mem|undo|func|cmds");
    add_builtin(&["set"], Builtin::Set,
        "Show or change settings.\nUsage: set [align l|d|r | width N | mem N]\nExample: set align d");
    add_builtin(&["reset"], Builtin::Reset,
        "Restore the default settings.\nUsage: reset");
    add_builtin(&["debug"], Builtin::Debug,
        "Toggle debug output.\nUsage: debug");
    add_builtin(&["version", "ver"], Builtin::Version,
        "Show the program version.\nUsage: ver");
    add_builtin(&["license"], Builtin::License,
        "Show the license.\nUsage: license");
    add_builtin(&["help", "h", "?"], Builtin::Help,
        "Show this help.\nUsage: help");
    add_builtin(&["exit", "x", "quit"], Builtin::Exit,
        "Save the stacks and exit.\nUsage: exit");
    add_builtin(&["clearexit", "cx"], Builtin::ClearExit,
        "Clear the stack, then exit.\nUsage: cx");

    registry
}
