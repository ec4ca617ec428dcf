use std::io::{self, BufRead, Write};

use crate::constraints::{
    parse_age, parse_term_list, parse_weight, ActivityLevel, DietaryPreference, HealthGoal,
    MacroTargets, UserConstraints,
};
use crate::error::AssistantResult;

/// Gathers validated constraints from a human, re-prompting until every field
/// parses. Generic over the IO pair so tests can drive the dialogue with
/// in-memory buffers; the CLI passes locked stdin and stdout.
///
/// Validation failures never leave this boundary. Running out of input mid
/// dialogue is an io error.
pub fn collect_constraints<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<UserConstraints> {
    let age = prompt_until(input, output, "Please enter your age: ", parse_age)?;
    let weight_kg = prompt_until(
        input,
        output,
        "Please enter your weight (kg): ",
        parse_weight,
    )?;
    let activity_level = prompt_until(
        input,
        output,
        "Please enter your activity level (sedentary, moderate, active): ",
        ActivityLevel::parse,
    )?;
    let dietary_preference = prompt_until(
        input,
        output,
        "Please enter your dietary preference (vegan, vegetarian, non_vegetarian): ",
        DietaryPreference::parse,
    )?;
    let health_goal = prompt_until(
        input,
        output,
        "Please enter your health goal (lose weight, maintain weight, gain weight): ",
        HealthGoal::parse,
    )?;
    let allergies = prompt_terms(
        input,
        output,
        "Please enter any food allergies you have (separate with commas): ",
    )?;
    let intolerances = prompt_terms(
        input,
        output,
        "Please enter any food intolerances you have (separate with commas): ",
    )?;
    let macro_targets = prompt_until(
        input,
        output,
        "Please enter your macronutrient goals in the format 'protein,carbs,fat' (in grams): ",
        MacroTargets::parse,
    )?;

    Ok(UserConstraints {
        age,
        weight_kg,
        activity_level,
        dietary_preference,
        health_goal,
        allergies,
        intolerances,
        macro_targets,
    })
}

fn prompt_until<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    parse: F,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> AssistantResult<T>,
{
    loop {
        let line = read_prompted_line(input, output, prompt)?;
        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(err) => writeln!(output, "Invalid input. {}", err)?,
        }
    }
}

fn prompt_terms<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Vec<String>> {
    // Term lists accept anything; empties are simply dropped.
    let line = read_prompted_line(input, output, prompt)?;
    Ok(parse_term_list(line.trim()))
}

fn read_prompted_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before all fields were provided",
        ));
    }
    Ok(line)
}
