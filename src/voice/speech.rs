//! Canned phrasing for every reply the skill speaks.
//!
//! Pure functions of their inputs; the dispatcher decides which one to call.

use crate::announcement::Announcement;
use crate::dashboard::DashboardState;

/// Setpoint the skill nudges people towards (°C).
pub const RECOMMENDED_TEMPERATURE: f64 = 21.0;

/// kg of CO2 per kWh of electricity.
pub const CO2_KG_PER_KWH: f64 = 0.4;

/// Extra monthly cost per degree above the recommended setpoint (€).
pub const COST_PER_DEGREE_EUR: f64 = 10.0;

/// Footprint above which usage is called "higher than average" (kg CO2).
const CO2_AVERAGE_KG: f64 = 4.0;

/// Below this health the tree reply suggests turning the heating down.
const HEALTHY_TREE_THRESHOLD: u8 = 7;

pub const WELCOME: &str = "Welcome to Eco Nudge. You can ask if there are any updates, say 'I'm home' to get your usage update, or ask about your environmental impact.";
pub const HELP: &str = "You can ask if there are any updates, say 'I'm home' to get your usage update, ask 'what's my environmental impact' to learn about your carbon footprint, or ask 'how's my tree doing' to check your eco tree's health.";
pub const GOODBYE: &str = "Goodbye!";
pub const NO_UPDATES: &str = "There are no new updates at this time. Your eco home is running normally.";
pub const NO_ANNOUNCEMENTS: &str = "There are no new announcements at this time.";
pub const UNKNOWN_INTENT: &str = "I'm not sure how to help with that. You can ask if there are any updates or say 'I'm home' to get your usage update.";
pub const UNKNOWN_REQUEST: &str = "I'm not sure how to help with that.";
pub const REQUEST_FAILED: &str = "Sorry, there was an error processing your request.";
pub const TEMPERATURE_NOT_UNDERSTOOD: &str = "I didn't catch a temperature. Please choose a value between 16 and 28 degrees.";

pub fn welcome_with_update(announcement: &Announcement) -> String {
    format!(
        "Welcome to Eco Nudge. I have an update for you: {}",
        announcement.spoken()
    )
}

pub fn any_updates(announcement: &Announcement) -> String {
    format!("Yes, I have an update for you: {}", announcement.spoken())
}

pub fn latest_announcement(announcement: &Announcement) -> String {
    format!("Here's the latest update: {}", announcement.spoken())
}

/// "I'm home" summary: usage against average, lost leaves and tips.
pub fn im_home(state: &DashboardState) -> String {
    let mut text = format!(
        "Welcome home! Today, your energy usage is {:.1} kilowatt hours",
        state.electricity_usage
    );

    if state.average_electricity > 0.0 {
        let ratio = state.electricity_usage / state.average_electricity;
        if state.electricity_usage > state.average_electricity {
            text.push_str(&format!(
                ", which is {}% above your average. ",
                round_half_up((ratio - 1.0) * 100.0)
            ));
        } else {
            text.push_str(&format!(
                ", which is {}% below your average. Great job! ",
                round_half_up((1.0 - ratio) * 100.0)
            ));
        }
    } else {
        text.push_str(". ");
    }

    let lost = state.lost_leaves();
    if lost > 0 {
        let noun = if lost == 1 { "leaf" } else { "leaves" };
        text.push_str(&format!("Your tree has lost {} {} today. ", lost, noun));

        if state.heating_on && state.temperature > RECOMMENDED_TEMPERATURE {
            text.push_str(&format!(
                "Try lowering your heating from {}°C to 21°C to save leaves. ",
                number(state.temperature)
            ));
        }
        if state.lights_on_unoccupied {
            text.push_str("Lights are on in unoccupied rooms. ");
        }
    } else {
        text.push_str("Your tree is looking healthy! Keep up the good habits.");
    }

    text.trim_end().to_string()
}

/// CO2 from today's electricity plus the heating savings estimate.
pub fn environmental_impact(state: &DashboardState) -> String {
    let co2 = co2_kg(state.electricity_usage);
    let savings = monthly_heating_savings(state.temperature);

    let mut text = format!(
        "Based on your current energy usage of {:.1} kilowatt hours, your estimated carbon footprint is {:.1} kilograms of CO2. ",
        state.electricity_usage, co2
    );

    if co2 > CO2_AVERAGE_KG {
        text.push_str("That's higher than average. ");
    } else {
        text.push_str("That's lower than average. Great job! ");
    }

    if savings > 0.0 {
        text.push_str(&format!(
            "You could save approximately €{:.2} per month by optimizing your heating temperature.",
            savings
        ));
    }

    text.trim_end().to_string()
}

pub fn tree_health(state: &DashboardState) -> String {
    let advice = if state.tree_health < HEALTHY_TREE_THRESHOLD {
        "Try lowering your heating temperature to improve your tree's health."
    } else {
        "Your tree is looking healthy!"
    };
    format!(
        "Your eco tree currently has {} out of 10 leaves. {}",
        state.tree_health, advice
    )
}

pub fn current_temperature(state: &DashboardState) -> String {
    let delta = state.temperature - RECOMMENDED_TEMPERATURE;
    let position = if delta > 0.0 {
        format!(
            "{} degrees above the recommended 21°C.",
            number(delta)
        )
    } else if delta < 0.0 {
        format!(
            "{} degrees below the recommended 21°C.",
            number(-delta)
        )
    } else {
        "exactly the recommended 21°C.".to_string()
    };
    format!(
        "Your heating is currently set to {}°C, which is {}",
        number(state.temperature),
        position
    )
}

pub fn temperature_out_of_range(requested: f64) -> String {
    format!(
        "{} degrees is outside the range I can set. Please choose a temperature between 16 and 28 degrees.",
        number(requested)
    )
}

/// Confirmation after the setpoint changed, with the projected extra cost.
pub fn temperature_changed(celsius: f64) -> String {
    let mut text = format!("OK, I've set your heating to {}°C.", number(celsius));
    let above = celsius - RECOMMENDED_TEMPERATURE;

    if above > 0.0 {
        text.push_str(&format!(
            " That's {} degrees above the recommended 21°C, which will cost about €{:.2} extra per month.",
            number(above),
            monthly_heating_savings(celsius)
        ));
    } else if above < 0.0 {
        text.push_str(" That's below the recommended 21°C, which saves energy.");
    } else {
        text.push_str(" That's the recommended temperature. Great choice!");
    }

    text
}

pub fn co2_kg(electricity_kwh: f64) -> f64 {
    electricity_kwh * CO2_KG_PER_KWH
}

/// What heating at `celsius` costs per month over the recommended setpoint.
pub fn monthly_heating_savings(celsius: f64) -> f64 {
    (celsius - RECOMMENDED_TEMPERATURE).max(0.0) * COST_PER_DEGREE_EUR
}

/// Wrap speech in an SSML `<speak>` element, escaping markup characters.
pub fn to_ssml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 15);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    format!("<speak>{}</speak>", escaped)
}

/// Round halves towards positive infinity (2.5 → 3, -2.5 → -2).
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Speak a number with at most one decimal: 22 → "22", 22.54 → "22.5".
fn number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // -0.0 == 0.0, so this also drops the sign of a negative zero
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}
