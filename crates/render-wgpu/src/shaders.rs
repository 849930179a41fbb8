/// WGSL shader for lit geometry: the environment and the avatar box.
///
/// Each draw carries a model matrix and colour per instance. Lighting uses
/// the absolute facing so double-sided environment faces shade the same
/// from either side.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.35;
    let diffuse = abs(dot(in.world_normal, light_dir));
    let lighting = ambient + diffuse * 0.65;
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;

/// WGSL shader for the collision wireframe overlay.
///
/// Edges are nudged toward the camera so they stay visible on the faces
/// they outline, and dim with view depth.
pub const LINE_SHADER: &str = r#"
@group(0) @binding(0)
var<uniform> view_proj: mat4x4<f32>;

const DEPTH_PULL: f32 = 0.0005;
const FADE_NEAR: f32 = 10.0;
const FADE_FAR: f32 = 60.0;

struct Edge {
    @builtin(position) clip: vec4<f32>,
    @location(0) tint: vec4<f32>,
};

@vertex
fn vs_line(@location(0) position: vec3<f32>, @location(1) color: vec4<f32>) -> Edge {
    var clip = view_proj * vec4<f32>(position, 1.0);
    clip.z -= DEPTH_PULL * clip.w;
    let near = 1.0 - smoothstep(FADE_NEAR, FADE_FAR, clip.w);
    return Edge(clip, vec4<f32>(color.rgb * mix(0.35, 1.0, near), color.a));
}

@fragment
fn fs_line(edge: Edge) -> @location(0) vec4<f32> {
    return edge.tint;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_points_match_pipelines() {
        for entry in ["fn vs_main", "fn fs_main"] {
            assert!(MESH_SHADER.contains(entry));
        }
        for entry in ["fn vs_line", "fn fs_line"] {
            assert!(LINE_SHADER.contains(entry));
        }
    }

    #[test]
    fn both_shaders_bind_view_projection_at_zero() {
        for source in [MESH_SHADER, LINE_SHADER] {
            assert!(source.contains("@group(0) @binding(0)"));
        }
    }
}
