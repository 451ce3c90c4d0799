// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Probe catalog compiled into the binary so the scanner works without a
//! probes directory on disk. `--probes-dir` overrides this set entirely.

/// Embedded probe documents as `(file name, yaml)` pairs
pub const EMBEDDED_PROBES: &[(&str, &str)] = &[
    ("anthropic.yaml", include_str!("../probes/anthropic.yaml")),
    ("koboldcpp.yaml", include_str!("../probes/koboldcpp.yaml")),
    ("litellm.yaml", include_str!("../probes/litellm.yaml")),
    ("llamacpp.yaml", include_str!("../probes/llamacpp.yaml")),
    ("lmstudio.yaml", include_str!("../probes/lmstudio.yaml")),
    ("localai.yaml", include_str!("../probes/localai.yaml")),
    ("ollama.yaml", include_str!("../probes/ollama.yaml")),
    (
        "open-webui.yaml",
        include_str!("../probes/open-webui.yaml"),
    ),
    (
        "openai-compatible.yaml",
        include_str!("../probes/openai-compatible.yaml"),
    ),
    ("openai.yaml", include_str!("../probes/openai.yaml")),
    ("openrouter.yaml", include_str!("../probes/openrouter.yaml")),
    (
        "text-generation-inference.yaml",
        include_str!("../probes/text-generation-inference.yaml"),
    ),
    ("triton.yaml", include_str!("../probes/triton.yaml")),
    ("vllm.yaml", include_str!("../probes/vllm.yaml")),
];
