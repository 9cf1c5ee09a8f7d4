#[cfg(test)]
pub mod tests {
    use serde_json::{json, Map, Value};
    use std::fs;

    use crate::cores::image_models::image_controller::echo_parameters;
    use crate::cores::image_models::params::{is_truthy, merge, overrides_from_request};
    use crate::cores::image_models::registry::ModelRegistry;
    use crate::cores::image_models::shapers::{ArgumentShaper, RemoteCallArgs};

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_registry_lists_builtin_models() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.list_identifiers(),
            vec!["stable-diffusion", "flux-dev", "flux-schnell", "midjourney"]
        );
        for name in registry.list_identifiers() {
            let model = registry.lookup(&name).unwrap();
            assert_eq!(model.name, name);
        }
        assert!(registry.lookup("unknown-model").is_none());
        assert!(registry.lookup("").is_none());
    }

    #[test]
    fn test_registry_builtin_descriptors() {
        let registry = ModelRegistry::builtin();
        let midjourney = registry.lookup("midjourney").unwrap();
        assert_eq!(midjourney.space, "ijohn07/Midjourney");
        assert_eq!(midjourney.endpoint, "/run");
        assert_eq!(midjourney.default_params["style"], json!("2560 x 1440"));

        let schnell = registry.lookup("flux-schnell").unwrap();
        assert_eq!(schnell.default_params["num_inference_steps"], json!(4));
        assert_eq!(schnell.example_usage["prompt"], json!("A cute cat sitting on a chair"));
    }

    #[test]
    fn test_registry_file_adds_and_replaces_models() {
        let path = std::env::temp_dir().join(format!("spacegate-models-{}.yaml", std::process::id()));
        fs::write(&path, r#"
- name: flux-dev
  space: my-org/FLUX.1-dev-mirror
  endpoint: /infer
  default_params:
    width: 768
- name: sdxl-lightning
  space: ByteDance/SDXL-Lightning
  endpoint: /generate_image
  default_params:
    ckpt: 4-Step
"#).unwrap();

        let registry = ModelRegistry::with_file(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(registry.list_identifiers().len(), 5);
        assert_eq!(registry.lookup("flux-dev").unwrap().space, "my-org/FLUX.1-dev-mirror");
        let lightning = registry.lookup("sdxl-lightning").unwrap();
        assert_eq!(lightning.description, "AI image generation model");
        assert!(lightning.example_usage.is_empty());
    }

    #[test]
    fn test_registry_file_missing() {
        assert!(ModelRegistry::with_file("/nonexistent/spacegate/models.yaml").is_err());
    }

    #[test]
    fn test_merge_without_overrides_keeps_defaults() {
        let defaults = object(json!({ "seed": 0, "width": 1024, "randomize_seed": true }));
        assert_eq!(merge(&defaults, &Map::new()), defaults);
    }

    #[test]
    fn test_merge_overrides_win() {
        let defaults = object(json!({ "seed": 0, "width": 1024, "height": 1024 }));
        let overrides = object(json!({ "width": 512, "style": "anime" }));
        let merged = merge(&defaults, &overrides);

        assert_eq!(merged["width"], json!(512));
        assert_eq!(merged["height"], json!(1024));
        assert_eq!(merged["seed"], json!(0));
        assert_eq!(merged["style"], json!("anime"));
        // Override keys keep the default position, new keys go last.
        let keys: Vec<&String> = merged.keys().collect();
        assert_eq!(keys, vec!["seed", "width", "height", "style"]);
    }

    #[test]
    fn test_merge_does_not_coerce() {
        let defaults = object(json!({ "width": 1024 }));
        let overrides = object(json!({ "width": "wide" }));
        assert_eq!(merge(&defaults, &overrides)["width"], json!("wide"));
    }

    #[test]
    fn test_overrides_exclude_model_and_prompt() {
        let fields = object(json!({ "model": "flux-dev", "prompt": "a cat", "seed": 7 }));
        assert_eq!(overrides_from_request(&fields), object(json!({ "seed": 7 })));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(false))));
        assert!(is_truthy(Some(&json!("blurry"))));
        assert!(is_truthy(Some(&json!(0.5))));
        assert!(is_truthy(Some(&json!([]))));
    }

    #[test]
    fn test_shape_flux_schnell_uses_defaults() {
        let registry = ModelRegistry::builtin();
        let model = registry.lookup("flux-schnell").unwrap();
        let shaper = ArgumentShaper::builtin();
        let effective = merge(&model.default_params, &Map::new());

        let args = shaper.shape("flux-schnell", &effective, "a cat");
        assert_eq!(args, object(json!({
            "prompt": "a cat",
            "seed": 0,
            "randomize_seed": true,
            "width": 1024,
            "height": 1024,
            "num_inference_steps": 4
        })));
    }

    #[test]
    fn test_shape_flux_dev_drops_unknown_fields() {
        let registry = ModelRegistry::builtin();
        let model = registry.lookup("flux-dev").unwrap();
        let effective = merge(&model.default_params, &object(json!({ "style": "anime", "seed": 9 })));

        let args = ArgumentShaper::builtin().shape("flux-dev", &effective, "a dog");
        assert!(args.get("style").is_none());
        assert_eq!(args["seed"], json!(9));
        assert_eq!(args["guidance_scale"], json!(3.5));
        assert_eq!(args["num_inference_steps"], json!(28));
    }

    #[test]
    fn test_shape_stable_diffusion_negative_fallback() {
        let shaper = ArgumentShaper::builtin();
        let effective = object(json!({ "negative": null, "scale": 9 }));
        let args = shaper.shape("stable-diffusion", &effective, "a tree");
        assert_eq!(args, object(json!({ "prompt": "a tree", "negative": "", "scale": 9 })));

        let effective = object(json!({ "scale": 7.5 }));
        let args = shaper.shape("stable-diffusion", &effective, "a tree");
        assert_eq!(args["negative"], json!(""));

        let effective = object(json!({ "negative": "blurry", "scale": 7.5 }));
        let args = shaper.shape("stable-diffusion", &effective, "a tree");
        assert_eq!(args["negative"], json!("blurry"));
    }

    #[test]
    fn test_shape_midjourney() {
        let registry = ModelRegistry::builtin();
        let model = registry.lookup("midjourney").unwrap();
        let effective = merge(&model.default_params, &object(json!({ "negative_prompt": false, "width": 768 })));

        let args = ArgumentShaper::builtin().shape("midjourney", &effective, "floating islands");
        let keys: Vec<&String> = args.keys().collect();
        assert_eq!(keys, vec![
            "prompt", "negative_prompt", "use_negative_prompt", "style", "seed",
            "width", "height", "guidance_scale", "randomize_seed",
        ]);
        assert_eq!(args["negative_prompt"], json!(""));
        assert_eq!(args["width"], json!(768));
    }

    #[test]
    fn test_shape_unknown_model_passes_through() {
        let shaper = ArgumentShaper::builtin();
        let effective = object(json!({ "prompt": "", "steps": 8, "sampler": "Euler" }));
        let args = shaper.shape("sdxl-lightning", &effective, "a lighthouse");

        assert_eq!(args, object(json!({ "prompt": "a lighthouse", "steps": 8, "sampler": "Euler" })));
        assert!(!shaper.has_rule("sdxl-lightning"));
    }

    #[test]
    fn test_shape_is_deterministic() {
        let shaper = ArgumentShaper::builtin();
        let effective = object(json!({ "seed": 1, "width": 64, "height": 64, "guidance_scale": 2 }));
        for model in ["stable-diffusion", "flux-dev", "flux-schnell", "midjourney", "other"] {
            assert_eq!(shaper.shape(model, &effective, "x"), shaper.shape(model, &effective, "x"));
        }
    }

    fn shape_square(effective: &Map<String, Value>, prompt: &str) -> RemoteCallArgs {
        let mut args = Map::new();
        args.insert("text".to_string(), json!(prompt));
        args.insert("size".to_string(), effective.get("width").cloned().unwrap_or(json!(512)));
        args
    }

    #[test]
    fn test_register_new_rule() {
        let mut shaper = ArgumentShaper::new();
        shaper.register("square", shape_square);
        assert!(shaper.has_rule("square"));

        let args = shaper.shape("square", &Map::new(), "a box");
        assert_eq!(args, object(json!({ "text": "a box", "size": 512 })));
    }

    #[test]
    fn test_echo_parameters() {
        let effective = object(json!({ "prompt": "", "negative": "", "scale": 7.5 }));
        let echo = echo_parameters("stable-diffusion", "a cat", &effective);
        assert_eq!(echo, object(json!({
            "model": "stable-diffusion",
            "prompt": "a cat",
            "negative": "",
            "scale": 7.5
        })));
    }
}
