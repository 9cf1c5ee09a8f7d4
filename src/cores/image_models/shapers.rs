use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::cores::image_models::params::{is_truthy, EffectiveParameters};

/// Named arguments for one remote call, in the order they were shaped.
pub type RemoteCallArgs = Map<String, Value>;

/// Projects effective parameters into the argument layout one endpoint expects.
pub type ShapeFn = fn(&EffectiveParameters, &str) -> RemoteCallArgs;

/// Shaping rules keyed by model identifier.
///
/// Identifiers without a rule are shaped as a pass-through of the prompt
/// followed by every effective parameter.
#[derive(Clone, Default)]
pub struct ArgumentShaper {
    rules: HashMap<String, ShapeFn>,
}

impl ArgumentShaper {
    pub fn new() -> Self {
        ArgumentShaper { rules: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let mut shaper = ArgumentShaper::new();
        shaper.register("stable-diffusion", shape_stable_diffusion);
        shaper.register("flux-dev", shape_flux_dev);
        shaper.register("flux-schnell", shape_flux_schnell);
        shaper.register("midjourney", shape_midjourney);
        shaper
    }

    pub fn register(&mut self, identifier: &str, rule: ShapeFn) {
        self.rules.insert(identifier.to_string(), rule);
    }

    pub fn has_rule(&self, identifier: &str) -> bool {
        self.rules.contains_key(identifier)
    }

    pub fn shape(&self, identifier: &str, effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
        match self.rules.get(identifier) {
            Some(rule) => rule(effective, prompt),
            None => shape_passthrough(effective, prompt),
        }
    }
}

fn with_prompt(prompt: &str) -> RemoteCallArgs {
    let mut args = Map::new();
    args.insert("prompt".to_string(), Value::String(prompt.to_string()));
    args
}

// Copies the listed keys that are present; absent keys stay absent.
fn pick(args: &mut RemoteCallArgs, effective: &EffectiveParameters, keys: &[&str]) {
    for key in keys {
        if let Some(value) = effective.get(*key) {
            args.insert(key.to_string(), value.clone());
        }
    }
}

fn or_empty_string(args: &mut RemoteCallArgs, effective: &EffectiveParameters, key: &str) {
    let value = effective.get(key);
    let value = if is_truthy(value) {
        value.cloned().unwrap_or(Value::Null)
    } else {
        Value::String(String::new())
    };
    args.insert(key.to_string(), value);
}

fn shape_stable_diffusion(effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
    let mut args = with_prompt(prompt);
    or_empty_string(&mut args, effective, "negative");
    pick(&mut args, effective, &["scale"]);
    args
}

fn shape_flux_dev(effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
    let mut args = with_prompt(prompt);
    pick(
        &mut args,
        effective,
        &["seed", "randomize_seed", "width", "height", "guidance_scale", "num_inference_steps"],
    );
    args
}

fn shape_flux_schnell(effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
    let mut args = with_prompt(prompt);
    pick(
        &mut args,
        effective,
        &["seed", "randomize_seed", "width", "height", "num_inference_steps"],
    );
    args
}

fn shape_midjourney(effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
    let mut args = with_prompt(prompt);
    or_empty_string(&mut args, effective, "negative_prompt");
    pick(
        &mut args,
        effective,
        &["use_negative_prompt", "style", "seed", "width", "height", "guidance_scale", "randomize_seed"],
    );
    args
}

fn shape_passthrough(effective: &EffectiveParameters, prompt: &str) -> RemoteCallArgs {
    let mut args = with_prompt(prompt);
    for (key, value) in effective {
        // The request prompt wins over a "prompt" default.
        if key == "prompt" {
            continue;
        }
        args.insert(key.clone(), value.clone());
    }
    args
}
