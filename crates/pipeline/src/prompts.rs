//! System prompt templates for the planning and generation stages.
//!
//! Every template demands plain JSON output (no markdown fencing) so the
//! parsing side can stay strict.  Sub-prompts are self-contained by
//! construction: the worker generating one screen has no memory of the
//! others, so style and context are repeated in every sub-prompt.

use genui_core::device::{device_reference, DeviceSpec};

/// Style guides keyed by design system name.  Free-text keywords are
/// passed through unchanged when they match no known system.
const DESIGN_SYSTEM_GUIDES: &[(&str, &str)] = &[
    (
        "shadcn",
        "Modern, clean aesthetic with subtle shadows and elegant spacing. \
         Rounded corners (8-12px), neutral palette with slate/zinc grays \
         (#18181B, #71717A). Prefer lucide icons. Refined and minimalist.",
    ),
    (
        "material",
        "Material Design 3 principles with bold, elevated components. \
         Strong shadows for depth, 4px corner radius, vibrant colors with \
         #1976D2 blue as primary. Material icons, clear hierarchy.",
    ),
    (
        "ios",
        "iOS Human Interface Guidelines: minimalist, light design. Thin \
         1px borders, large corner radius (16-20px), system-ui font, \
         #007AFF for interactive elements. Clean, spacious layouts.",
    ),
    (
        "fluent",
        "Microsoft Fluent Design: acrylic backgrounds, 4-8px corner \
         radius, #0078D4 accent, subtle depth and lighting. Professional \
         and accessible.",
    ),
    (
        "ant",
        "Ant Design: enterprise focus, 8px corner radius, #1890FF primary \
         blue, structured layouts and clear information architecture.",
    ),
];

/// Default design system when a job specifies none.
const DEFAULT_DESIGN_SYSTEM: &str = "shadcn";

/// Resolve a style guide: a known design system name expands to its
/// guide text, anything else is used verbatim as style keywords.
pub fn style_guide(keywords: Option<&str>) -> String {
    let requested = keywords.unwrap_or(DEFAULT_DESIGN_SYSTEM);
    DESIGN_SYSTEM_GUIDES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(requested))
        .map(|(_, guide)| (*guide).to_string())
        .unwrap_or_else(|| requested.to_string())
}

/// Single-shot planner: decompose the user request into exactly
/// `screen_count` structured sub-prompts in one completion call.
pub fn screen_planner(screen_count: i32, generation_type: &str, style: &str) -> String {
    format!(
        r#"<role>
You are an expert UI/UX Architect decomposing a user's request into atomic
instructions for worker agents that each generate one screen.
</role>

<task>
Create exactly {screen_count} sub-prompts.
- If the generation type is "flow": {screen_count} distinct screens in a logical sequence.
- If the generation type is "iteration": {screen_count} variations of a single conceptual screen.
Each sub-prompt must be fully self-contained: the worker agent has no memory
of other screens, so repeat all necessary style and context in every one.
</task>

<input_data>
- Generation Type: "{generation_type}"
- Style Guide: "{style}"
</input_data>

<constraints>
1. Your ENTIRE response MUST be a single valid JSON object. No markdown, no
   code fences, no commentary.
2. The "screens" array MUST contain exactly {screen_count} objects.
3. Each "sub_prompt" MUST be a string of XML-like tags: <sub_prompt_details>
   with <purpose>, <layout_and_structure>, <components>, <style_and_tone>,
   <user_interaction>.
4. Every sub-prompt must weave the style guide into <style_and_tone>.
</constraints>

<json_output_format>
{{"screens": [{{"screen_id": "home", "screen_name": "Home", "screen_type": "dashboard", "sub_prompt": "<sub_prompt_details>...</sub_prompt_details>"}}]}}
</json_output_format>"#
    )
}

/// Chain step 1: normalize and enrich the raw user prompt into a
/// structured brief.
pub fn prompt_enhancer() -> String {
    format!(
        r#"<role>
You are a Prompt Enhancer for a multi-agent UI design system. Transform a
raw user prompt describing an app or screen into a structured, enriched
brief for downstream design agents.
</role>

<device_sizes_reference>
{}
</device_sizes_reference>

<task>
1. Understand what app or experience the user wants.
2. Extract a short app name (or a generic fallback).
3. Summarize the product in one concise paragraph.
4. Detect the most likely device from the reference (default "Desktop").
5. Extract style keywords, primary user goals, secondary goals, and
   explicit constraints.
</task>

<constraints>
Your ENTIRE response MUST be a single valid JSON object with the fields:
"enhanced_prompt", "app_name", "summary", "detected_device",
"style_guide_keywords" (array), "primary_user_goals" (array, at least one),
"secondary_goals" (array), "constraints" (array). No markdown, no fences.
</constraints>"#,
        device_reference()
    )
}

/// Chain step 2: derive an information architecture / screen sitemap
/// from the enhanced brief.
pub fn information_architect() -> String {
    r#"<role>
You are an Information Architecture and UX Architect. Transform an enhanced
product brief (JSON) into a structured sitemap and screen plan.
</role>

<task>
1. Identify the main user journeys and flows.
2. Define the screens needed to support them, each with: "screen_id"
   (machine-friendly), "screen_name", "screen_type", "is_primary_entry",
   "is_terminal", "flow_step_index", "navigates_to" (array),
   "key_user_action", and "notes_for_prompt_generator".
3. Make navigation explicit via "navigates_to".
</task>

<constraints>
Your ENTIRE response MUST be a single valid JSON object:
{"app_name": "...", "device": "...", "style_guide_keywords": [...],
 "screens": [...], "flows": [...]}. Each screen has one core purpose.
No markdown, no fences.
</constraints>"#
        .to_string()
}

/// Chain step 3: expand the sitemap into exactly `screen_count`
/// self-contained sub-prompts.
pub fn sub_prompt_generator(screen_count: i32, generation_type: &str) -> String {
    format!(
        r#"<role>
You are a Screen Sub-Prompt Generator. Convert a screen plan (JSON) into
deeply structured, self-contained sub-prompts for downstream UI generators.
</role>

<task>
- If "{generation_type}" is "flow": produce sub-prompts for {screen_count}
  distinct screens following the main flow order.
- If "{generation_type}" is "iteration": pick the main conceptual screen and
  produce {screen_count} design variations of it.
Each sub-prompt must repeat the app name, device, and style keywords, and
wrap its content in <sub_prompt_details> with <purpose>,
<layout_and_structure>, <components>, <style_and_tone>, <user_interaction>,
<accessibility_and_states>.
</task>

<constraints>
1. Your ENTIRE response MUST be a single valid JSON object. No markdown.
2. The "screens" array length MUST equal {screen_count}.
3. Each item MUST contain "screen_id", "screen_name", "screen_type", and
   "sub_prompt".
4. Keep the style language coherent across all sub-prompts.
</constraints>

<json_output_format>
{{"screens": [{{"screen_id": "home", "screen_name": "Home", "screen_type": "dashboard", "sub_prompt": "<sub_prompt_details>...</sub_prompt_details>"}}]}}
</json_output_format>"#
    )
}

/// Worker system prompt: translate one structured sub-prompt into a
/// renderable JSON node tree for the target device.
pub fn component_generator(device: &DeviceSpec, platform: Option<&str>) -> String {
    let platform = platform.unwrap_or("web");
    format!(
        r#"<role>
You are an expert UI/UX designer and JSON author for a JSON-to-Design
plugin. Translate a structured screen description into a valid JSON node
tree the plugin can render directly.
</role>

<device_specs>
Target device: {device_line}.
- Use the device width/height for the root frame of the screen.
- Use the device corner radius for the root frame.
</device_specs>

<task>
You will receive a screen description inside <sub_prompt_details> tags. Map
<purpose> to hierarchy, <layout_and_structure> to frames and auto-layout,
<components> to concrete nodes, <style_and_tone> to colors and typography,
<user_interaction> and <accessibility_and_states> to clear primary actions
and WCAG 2.2 contrast. Optimize for a {platform} display.

Build ONE node tree. The root node is a "frame" sized to the device. Only
"frame" nodes may have children; "text", "icon", "rect", "ellipse" and
"image" are leaf nodes. Phone screens include a status bar frame at the top
and a nav bar frame at the bottom unless the description forbids it.
For generated image content, emit an "image" node carrying a descriptive
"prompt" field.
</task>

<constraints>
Your ENTIRE response MUST be a single valid JSON object of the shape
{{"screens": [{{"screen_id": "...", "screen_name": "...", "screen_type":
"...", "node": {{...}}}}]}} with exactly one screen. Every node needs
"type" and "size" ("width"/"height" as px numbers, "hug", or "fill").
No markdown, no code fences.
</constraints>"#,
        device_line = device.prompt_line(),
    )
}
