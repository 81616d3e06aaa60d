//! Unit tests for image.rs

use crate::command::mock_backend::{MockCommandList, RecordedCommand};
use crate::command::SubresourceRange;
use crate::error::Error;
use crate::resource::{
    AspectFlags, Format, ImageDimension, ImageHandle, ImageInfo, ImageLayout,
    ImageRegistry, ImageResource,
};

// ============================================================================
// LAYOUT / DIMENSION
// ============================================================================

#[test]
fn test_layouts_accepting_transfer_writes() {
    assert!(ImageLayout::General.accepts_transfer_writes());
    assert!(ImageLayout::TransferDst.accepts_transfer_writes());

    for layout in [
        ImageLayout::Undefined,
        ImageLayout::ColorAttachment,
        ImageLayout::DepthStencilAttachment,
        ImageLayout::ShaderReadOnly,
        ImageLayout::TransferSrc,
        ImageLayout::PresentSrc,
    ] {
        assert!(!layout.accepts_transfer_writes(), "{:?}", layout);
    }
}

#[test]
fn test_only_3d_is_volume() {
    assert!(ImageDimension::D3.is_volume());
    assert!(!ImageDimension::D2.is_volume());
    assert!(!ImageDimension::D2Array.is_volume());
    assert!(!ImageDimension::Cube.is_volume());
}

#[test]
fn test_image_info_constructors() {
    let info = ImageInfo::new_2d_array(Format::R8G8B8A8_UNORM, 64, 32, 6).with_mip_levels(3);
    assert_eq!(info.dimension, ImageDimension::D2Array);
    assert_eq!(info.array_layers, 6);
    assert_eq!(info.mip_levels, 3);
    assert_eq!(info.depth, 1);

    let volume = ImageInfo::new_3d(Format::R16G16B16A16_SFLOAT, 16, 16, 8);
    assert_eq!(volume.dimension, ImageDimension::D3);
    assert_eq!(volume.depth, 8);
    assert_eq!(volume.array_layers, 1);

    assert_eq!(ImageInfo::new_2d(Format::D16_UNORM, 4, 4).with_mip_levels(0).mip_levels, 1);
}

// ============================================================================
// TRANSITION
// ============================================================================

#[test]
fn test_new_image_starts_undefined() {
    let image = ImageResource::new(ImageHandle(7), ImageInfo::new_2d(Format::R8G8B8A8_UNORM, 8, 8));
    assert_eq!(image.layout(), ImageLayout::Undefined);
    assert_eq!(image.handle(), ImageHandle(7));
    assert_eq!(image.format(), Format::R8G8B8A8_UNORM);
}

#[test]
fn test_transition_records_whole_image_barrier_and_updates_layout() {
    let info = ImageInfo::new_2d_array(Format::R8G8B8A8_UNORM, 8, 8, 4).with_mip_levels(2);
    let mut image = ImageResource::new(ImageHandle(3), info);
    image.assume_layout(ImageLayout::ColorAttachment);

    let mut cmd = MockCommandList::new();
    image.transition(&mut cmd, AspectFlags::COLOR, ImageLayout::TransferDst).unwrap();

    assert_eq!(image.layout(), ImageLayout::TransferDst);
    assert_eq!(cmd.commands.len(), 1);
    match &cmd.commands[0] {
        RecordedCommand::Barrier(barrier) => {
            assert_eq!(barrier.image, ImageHandle(3));
            assert_eq!(barrier.old_layout, ImageLayout::ColorAttachment);
            assert_eq!(barrier.new_layout, ImageLayout::TransferDst);
            assert_eq!(
                barrier.range,
                SubresourceRange {
                    aspect: AspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 2,
                    base_array_layer: 0,
                    layer_count: 4,
                }
            );
        }
        other => panic!("expected a barrier, got {:?}", other),
    }
}

#[test]
fn test_failed_transition_keeps_layout() {
    let mut image = ImageResource::new(ImageHandle(1), ImageInfo::new_2d(Format::D32_FLOAT, 8, 8));
    image.assume_layout(ImageLayout::DepthStencilAttachment);

    let mut cmd = MockCommandList::new();
    cmd.fail_with = Some(Error::BackendError("device lost".to_string()));

    assert!(image.transition(&mut cmd, AspectFlags::DEPTH, ImageLayout::TransferDst).is_err());
    assert_eq!(image.layout(), ImageLayout::DepthStencilAttachment);
}

// ============================================================================
// REGISTRY
// ============================================================================

#[test]
fn test_registry_insert_get_remove() {
    let mut registry = ImageRegistry::new();

    let key = registry.insert(ImageResource::new(
        ImageHandle(11),
        ImageInfo::new_2d(Format::B8G8R8A8_SRGB, 16, 16),
    ));
    assert_eq!(registry.get(key).unwrap().handle(), ImageHandle(11));

    registry.get_mut(key).unwrap().assume_layout(ImageLayout::General);
    assert_eq!(registry.get(key).unwrap().layout(), ImageLayout::General);

    assert!(registry.remove(key).is_some());
    assert!(registry.get(key).is_none());
    assert!(registry.remove(key).is_none());
}
